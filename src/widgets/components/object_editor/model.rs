use super::*;

impl ObjectEditor {
    /// Infers a type map for every container above the depth ceiling that
    /// does not have one yet, then lays declared schema tags over the root.
    pub(super) fn reindex(&mut self) {
        Self::index_container(&self.value, &ValuePath::root(), self.max_depth, &mut self.type_maps);
        self.apply_schema();
    }

    fn index_container(
        value: &Value,
        path: &ValuePath,
        max_depth: usize,
        maps: &mut HashMap<ValuePath, TypeMap>,
    ) {
        if !value.is_container() || path.depth() >= max_depth {
            return;
        }
        maps.entry(path.clone())
            .or_insert_with(|| TypeMap::infer_for(value));
        match value {
            Value::Object(fields) => {
                for (key, child) in fields {
                    Self::index_container(child, &path.child_key(key.clone()), max_depth, maps);
                }
            }
            Value::List(items) => {
                for (index, child) in items.iter().enumerate() {
                    Self::index_container(child, &path.child_index(index), max_depth, maps);
                }
            }
            _ => {}
        }
    }

    pub(super) fn apply_schema(&mut self) {
        let (Some(schema), Value::Object(fields)) = (self.schema.as_ref(), &self.value) else {
            return;
        };
        let root = self
            .type_maps
            .entry(ValuePath::root())
            .or_insert_with(TypeMap::new);
        for key in fields.keys() {
            if let Some(tag) = schema.type_tag(key) {
                root.set(FieldKey::Named(key.clone()), tag);
            }
        }
    }

    /// Forgets everything recorded for `path` and below, then infers fresh
    /// type maps for whatever value now lives there.
    pub(super) fn reindex_subtree(&mut self, path: &ValuePath) {
        self.forget_below(path);
        if let Some(value) = self.value.get_path(path) {
            Self::index_container(value, path, self.max_depth, &mut self.type_maps);
        }
    }

    /// Drops path-keyed state at `path` and below. The parent's entry for
    /// `path` is left alone.
    pub(super) fn forget_below(&mut self, path: &ValuePath) {
        self.remap_paths(|candidate| {
            if candidate.starts_with(path) {
                None
            } else {
                Some(candidate.clone())
            }
        });
    }

    /// Rewrites every path-keyed entry; `None` drops the entry.
    pub(super) fn remap_paths(&mut self, remap: impl Fn(&ValuePath) -> Option<ValuePath>) {
        self.expanded = std::mem::take(&mut self.expanded)
            .into_iter()
            .filter_map(|path| remap(&path))
            .collect();
        self.type_maps = std::mem::take(&mut self.type_maps)
            .into_iter()
            .filter_map(|(path, map)| remap(&path).map(|path| (path, map)))
            .collect();
        self.drafts = std::mem::take(&mut self.drafts)
            .into_iter()
            .filter_map(|(path, draft)| remap(&path).map(|path| (path, draft)))
            .collect();
        self.edits = std::mem::take(&mut self.edits)
            .into_iter()
            .filter_map(|(path, session)| remap(&path).map(|path| (path, session)))
            .collect();
    }

    pub(super) fn is_expandable(&self, path: &ValuePath) -> bool {
        path.depth() < self.max_depth
            && self
                .value
                .get_path(path)
                .is_some_and(|value| value.is_container() && !value.is_empty_container())
    }

    /// Visible rows in display order. Children of expanded rows follow their
    /// parent.
    pub fn rows(&self) -> Vec<ValueNode> {
        let mut out = Vec::new();
        self.collect_rows(&self.value, &ValuePath::root(), &mut out);
        out
    }

    fn collect_rows(&self, container: &Value, path: &ValuePath, out: &mut Vec<ValueNode>) {
        let children: Vec<(FieldKey, ValuePath, &Value)> = match container {
            Value::Object(fields) => fields
                .iter()
                .map(|(key, child)| (FieldKey::Named(key.clone()), path.child_key(key.clone()), child))
                .collect(),
            Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(index, child)| (FieldKey::Indexed(index), path.child_index(index), child))
                .collect(),
            _ => return,
        };
        let map = self.type_maps.get(path);
        let editing = self.edits.get(path).map(|session| &session.child);
        let depth = path.depth();

        for (key, child_path, child) in children {
            let tag = match map {
                Some(map) => map.tag_for(&key, child),
                None => crate::core::type_tag::infer_tag(child),
            };
            let complex = child.is_container() && !child.is_empty_container();
            let expandable = complex && depth + 1 < self.max_depth;
            let state = if editing == Some(&key) {
                NodeState::Editing
            } else if expandable && self.expanded.contains(&child_path) {
                NodeState::Expanded
            } else {
                NodeState::Collapsed
            };
            out.push(ValueNode {
                key,
                tag,
                path: child_path.clone(),
                depth,
                state,
                expandable,
                flattened: complex && !expandable,
                value: child.clone(),
                summary: child.summary(),
            });
            if state == NodeState::Expanded {
                self.collect_rows(child, &child_path, out);
            }
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn active_row(&self) -> Option<ValueNode> {
        self.rows().into_iter().nth(self.cursor)
    }

    /// Moves the cursor onto `path` if the row is visible.
    pub fn focus_path(&mut self, path: &ValuePath) -> bool {
        match self.rows().iter().position(|row| &row.path == path) {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    pub(super) fn move_cursor(&mut self, delta: isize) -> bool {
        let len = self.rows().len();
        if len == 0 {
            return false;
        }
        let next = self.cursor.saturating_add_signed(delta).min(len - 1);
        let moved = next != self.cursor;
        self.cursor = next;
        moved
    }

    pub(super) fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

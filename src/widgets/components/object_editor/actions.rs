use super::*;

impl ObjectEditor {
    /// Collapsed ⇄ expanded for non-empty containers above the depth ceiling.
    /// A row being edited keeps its state.
    pub fn toggle_expand(&mut self, path: &ValuePath) -> bool {
        if !self.is_expandable(path) || self.is_editing(path) {
            debug!(%path, "toggle_expand ignored");
            return false;
        }
        if !self.expanded.remove(path) {
            self.expanded.insert(path.clone());
        }
        self.clamp_cursor();
        true
    }

    /// Opens an edit session on the row at `path`. Any other session in the
    /// same container is discarded.
    pub fn start_edit(&mut self, path: &ValuePath) -> bool {
        let (Some(parent), Some(segment)) = (path.parent(), path.last()) else {
            debug!("start_edit ignored on the root");
            return false;
        };
        let Some(value) = self.value.get_path(path).cloned() else {
            debug!(%path, "start_edit ignored, no such node");
            return false;
        };
        let key = field_key(segment);
        let Some(tag) = self.tag_at(path) else {
            return false;
        };
        self.expanded.remove(path);
        let copy = WorkingCopy {
            name: key.to_string(),
            tag,
            value,
        };
        let validators = match (&key, parent.is_root()) {
            (FieldKey::Named(name), true) => self
                .rules
                .iter()
                .filter(|rule| rule.name == *name)
                .flat_map(for_rule)
                .collect(),
            _ => Vec::new(),
        };
        self.edits.insert(parent, EditSession::new(key, copy, validators));
        self.clamp_cursor();
        true
    }

    pub fn working_copy_mut(&mut self, path: &ValuePath) -> Option<&mut WorkingCopy> {
        self.session_for_mut(path).map(|session| &mut session.copy)
    }

    pub fn set_working_name(&mut self, path: &ValuePath, name: impl Into<String>) -> bool {
        match self.session_for_mut(path) {
            Some(session) => {
                session.copy.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Switches the working tag. The working value is coerced to it and the
    /// scalar input is swapped for the new tag's.
    pub fn set_working_tag(&mut self, path: &ValuePath, tag: TypeTag) -> bool {
        let Some(session) = self.session_for_mut(path) else {
            return false;
        };
        if session.copy.tag != tag {
            session.copy.value = coerce(&session.copy.value, tag);
            session.copy.tag = tag;
            session.input = scalar_input(tag, &session.copy.value);
            session.error = None;
        }
        true
    }

    pub fn set_working_value(&mut self, path: &ValuePath, value: Value) -> bool {
        let Some(session) = self.session_for_mut(path) else {
            return false;
        };
        if let Some(input) = session.input.as_mut() {
            input.set_value(value.clone());
        }
        session.copy.value = value;
        session.error = None;
        true
    }

    /// Writes the coerced working value back into the parent and closes the
    /// session. Objects honor a rename; a blank name keeps the old key and a
    /// name already taken by a sibling overwrites it.
    pub fn commit_edit(&mut self, path: &ValuePath) -> bool {
        let Some(parent_path) = path.parent() else {
            return false;
        };
        if self.session_for(path).is_none() {
            debug!(%path, "commit_edit ignored, not editing");
            return false;
        }
        let Some(session) = self.edits.remove(&parent_path) else {
            return false;
        };

        let WorkingCopy { name, tag, value } = session.copy;
        let coerced = coerce(&value, tag);
        let changed = self.value.get_path(path) != Some(&coerced);
        let Some(parent) = self.value.get_path_mut(&parent_path) else {
            debug!(%path, "commit_edit dropped, parent is gone");
            return false;
        };

        let committed_path = match (parent, session.child) {
            (Value::Object(fields), FieldKey::Named(old_key)) => {
                let new_key = match name.trim() {
                    "" => old_key.clone(),
                    trimmed => trimmed.to_string(),
                };
                if new_key == old_key {
                    fields.insert(old_key.clone(), coerced);
                } else {
                    let mut at = fields.get_index_of(old_key.as_str()).unwrap_or(fields.len());
                    fields.shift_remove(old_key.as_str());
                    if let Some(existing) = fields.get_index_of(new_key.as_str()) {
                        fields.shift_remove(new_key.as_str());
                        if existing < at {
                            at -= 1;
                        }
                    }
                    fields.shift_insert(at.min(fields.len()), new_key.clone(), coerced);
                }
                self.rename_state(&parent_path, &old_key, &new_key);
                self.type_maps
                    .entry(parent_path.clone())
                    .or_insert_with(TypeMap::new)
                    .set(FieldKey::Named(new_key.clone()), tag);
                parent_path.child_key(new_key)
            }
            (Value::List(items), FieldKey::Indexed(index)) if index < items.len() => {
                items[index] = coerced;
                self.type_maps
                    .entry(parent_path.clone())
                    .or_insert_with(TypeMap::new)
                    .set(FieldKey::Indexed(index), tag);
                parent_path.child_index(index)
            }
            _ => {
                debug!(%path, "commit_edit dropped, parent shape changed");
                return false;
            }
        };

        if changed {
            self.reindex_subtree(&committed_path);
        } else {
            self.expanded.remove(&committed_path);
        }
        self.clamp_cursor();
        self.emit_change();
        true
    }

    /// Discards the working copy; the value is untouched.
    pub fn cancel_edit(&mut self, path: &ValuePath) -> bool {
        let Some(parent) = path.parent() else {
            return false;
        };
        if self.session_for(path).is_none() {
            debug!(%path, "cancel_edit ignored, not editing");
            return false;
        }
        self.edits.remove(&parent);
        true
    }

    /// Moves state recorded under `parent.old` to `parent.new`. State that
    /// belonged to an overwritten `parent.new` is dropped first.
    fn rename_state(&mut self, parent: &ValuePath, old_key: &str, new_key: &str) {
        if old_key == new_key {
            return;
        }
        let old_path = parent.child_key(old_key);
        let new_path = parent.child_key(new_key);
        self.forget_below(&new_path);
        self.remap_paths(|path| Some(path.rebase(&old_path, &new_path)));
        if let Some(map) = self.type_maps.get_mut(parent) {
            map.remove(&FieldKey::Named(new_key.to_string()));
            map.rename(
                &FieldKey::Named(old_key.to_string()),
                FieldKey::Named(new_key.to_string()),
            );
        }
    }

    pub fn set_draft_name(&mut self, container: &ValuePath, name: impl Into<String>) {
        self.drafts.entry(container.clone()).or_default().name = name.into();
    }

    pub fn set_draft_tag(&mut self, container: &ValuePath, tag: TypeTag) {
        self.drafts.entry(container.clone()).or_default().tag = tag;
    }

    pub fn set_draft_value(&mut self, container: &ValuePath, value: Value) {
        self.drafts.entry(container.clone()).or_default().value = value;
    }

    /// Adds the pending draft of `container` and, on success, clears its name
    /// and value. The draft tag is kept for the next entry.
    pub fn add_draft(&mut self, container: &ValuePath) -> bool {
        let draft = self.draft(container);
        let added = match self.value.get_path(container) {
            Some(Value::Object(_)) => self.add_field(container, &draft.name, draft.tag, draft.value),
            Some(Value::List(_)) => self.add_item(container, draft.tag, draft.value),
            _ => {
                debug!(%container, "add_draft ignored, not a container");
                false
            }
        };
        if added {
            self.drafts
                .insert(container.clone(), FieldDraft::with_tag(draft.tag));
        }
        added
    }

    /// Sets `container[name]` to the coerced value. Blank names are rejected;
    /// an existing field of the same name is overwritten in place.
    pub fn add_field(
        &mut self,
        container: &ValuePath,
        name: &str,
        tag: TypeTag,
        value: impl Into<Value>,
    ) -> bool {
        let name = name.trim();
        if name.is_empty() {
            debug!(%container, "add_field ignored, blank name");
            return false;
        }
        let Some(Value::Object(fields)) = self.value.get_path_mut(container) else {
            debug!(%container, "add_field ignored, not an object");
            return false;
        };
        fields.insert(name.to_string(), coerce(&value.into(), tag));
        let key = FieldKey::Named(name.to_string());
        if self.edits.get(container).is_some_and(|session| session.child == key) {
            self.edits.remove(container);
        }
        self.type_maps
            .entry(container.clone())
            .or_insert_with(TypeMap::new)
            .set(key, tag);
        self.reindex_subtree(&container.child_key(name));
        self.emit_change();
        true
    }

    /// Appends the coerced value to the list at `container`.
    pub fn add_item(&mut self, container: &ValuePath, tag: TypeTag, value: impl Into<Value>) -> bool {
        let Some(Value::List(items)) = self.value.get_path_mut(container) else {
            debug!(%container, "add_item ignored, not a list");
            return false;
        };
        let index = items.len();
        items.push(coerce(&value.into(), tag));
        self.type_maps
            .entry(container.clone())
            .or_insert_with(TypeMap::new)
            .push_index(index, tag);
        self.reindex_subtree(&container.child_index(index));
        self.emit_change();
        true
    }

    pub fn remove_field(&mut self, container: &ValuePath, name: &str) -> bool {
        let Some(Value::Object(fields)) = self.value.get_path_mut(container) else {
            debug!(%container, "remove_field ignored, not an object");
            return false;
        };
        if fields.shift_remove(name).is_none() {
            debug!(%container, name, "remove_field ignored, no such field");
            return false;
        }
        let key = FieldKey::Named(name.to_string());
        if let Some(map) = self.type_maps.get_mut(container) {
            map.remove(&key);
        }
        if self.edits.get(container).is_some_and(|session| session.child == key) {
            self.edits.remove(container);
        }
        self.forget_below(&container.child_key(name));
        self.clamp_cursor();
        self.emit_change();
        true
    }

    /// Removes element `index` and renumbers everything recorded for the
    /// elements after it.
    pub fn remove_item(&mut self, container: &ValuePath, index: usize) -> bool {
        let Some(Value::List(items)) = self.value.get_path_mut(container) else {
            debug!(%container, "remove_item ignored, not a list");
            return false;
        };
        if index >= items.len() {
            debug!(%container, index, "remove_item ignored, out of range");
            return false;
        }
        items.remove(index);
        if let Some(map) = self.type_maps.get_mut(container) {
            map.remove_index(index);
        }
        match self.edits.get(container).map(|session| session.child.clone()) {
            Some(FieldKey::Indexed(child)) if child == index => {
                self.edits.remove(container);
            }
            Some(FieldKey::Indexed(child)) if child > index => {
                if let Some(session) = self.edits.get_mut(container) {
                    session.child = FieldKey::Indexed(child - 1);
                }
            }
            _ => {}
        }
        self.remap_paths(|path| path.after_removal(container, index));
        self.clamp_cursor();
        self.emit_change();
        true
    }

    /// Removes the node at `path` from its parent, whichever kind it is.
    pub fn remove(&mut self, path: &ValuePath) -> bool {
        let (Some(parent), Some(segment)) = (path.parent(), path.last()) else {
            return false;
        };
        match segment {
            PathSegment::Key(name) => self.remove_field(&parent, name),
            PathSegment::Index(index) => self.remove_item(&parent, *index),
        }
    }
}

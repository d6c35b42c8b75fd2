use super::*;

impl ObjectEditor {
    pub fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if self.commit_chord.matches(key) {
            return self.commit_and_continue();
        }

        let Some(active) = self.active_row() else {
            return InteractionResult::ignored();
        };
        if active.state == NodeState::Editing {
            return self.handle_editing(&active.path, key);
        }
        self.handle_normal(active, key)
    }

    /// Container the draft form belongs to for the current cursor: the
    /// active row when it is an open container, else the active row's parent.
    pub fn draft_target(&self) -> ValuePath {
        match self.active_row() {
            Some(row) if row.state == NodeState::Expanded => row.path,
            Some(row) => row.path.parent().unwrap_or_else(ValuePath::root),
            None => ValuePath::root(),
        }
    }

    fn commit_and_continue(&mut self) -> InteractionResult {
        let container = self.draft_target();
        let mut result = InteractionResult::handled();
        if self.add_draft(&container) {
            result = result.push(WidgetAction::ValueChanged);
        }
        result.push(WidgetAction::FocusDraft { container })
    }

    fn handle_normal(&mut self, active: ValueNode, key: KeyEvent) -> InteractionResult {
        if !key.modifiers.is_empty() {
            return InteractionResult::ignored();
        }
        match key.code {
            KeyCode::Up => {
                self.move_cursor(-1);
                InteractionResult::handled()
            }
            KeyCode::Down => {
                self.move_cursor(1);
                InteractionResult::handled()
            }
            KeyCode::Right if active.state == NodeState::Collapsed && active.expandable => {
                self.toggle_expand(&active.path);
                InteractionResult::handled()
            }
            KeyCode::Left if active.state == NodeState::Expanded => {
                self.toggle_expand(&active.path);
                InteractionResult::handled()
            }
            KeyCode::Left => {
                if let Some(parent) = active.path.parent()
                    && !parent.is_root()
                {
                    self.focus_path(&parent);
                }
                InteractionResult::handled()
            }
            KeyCode::Char(' ') => {
                self.toggle_expand(&active.path);
                InteractionResult::handled()
            }
            KeyCode::Enter => {
                self.start_edit(&active.path);
                InteractionResult::handled()
            }
            KeyCode::Delete => {
                if self.remove(&active.path) {
                    InteractionResult::with_action(WidgetAction::ValueChanged)
                } else {
                    InteractionResult::handled()
                }
            }
            _ => InteractionResult::ignored(),
        }
    }

    fn handle_editing(&mut self, path: &ValuePath, key: KeyEvent) -> InteractionResult {
        if key.code == KeyCode::Esc {
            self.cancel_edit(path);
            return InteractionResult::with_action(WidgetAction::EditCancelled { path: path.clone() });
        }

        let Some(session) = self.session_for_mut(path) else {
            return InteractionResult::ignored();
        };
        let forwarded = match session.input.as_mut() {
            Some(input) => {
                let before = input.display();
                let result = input.on_key(key);
                if result.handled && input.display() != before {
                    session.copy.value = input.value();
                    session.error = None;
                }
                result
            }
            None => InteractionResult::ignored(),
        };

        let submit = forwarded.has(&WidgetAction::InputDone)
            || (!forwarded.handled && key.code == KeyCode::Enter && key.modifiers.is_empty());
        if submit {
            return self.submit_edit(path);
        }
        if forwarded.handled {
            InteractionResult::handled()
        } else {
            InteractionResult::ignored()
        }
    }

    /// Commits after the scalar input accepts its value. A rejected value
    /// keeps the session open with the message available from `edit_error`.
    fn submit_edit(&mut self, path: &ValuePath) -> InteractionResult {
        if let Some(session) = self.session_for_mut(path)
            && let Err(message) = session.check()
        {
            debug!(%path, %message, "edit rejected");
            session.error = Some(message);
            return InteractionResult::handled();
        }

        let renamed = self.working_copy(path).and_then(|copy| {
            let name = copy.name.trim();
            match path.last() {
                Some(PathSegment::Key(old)) if !name.is_empty() && name != old.as_str() => {
                    path.parent().map(|parent| parent.child_key(name))
                }
                _ => None,
            }
        });
        if !self.commit_edit(path) {
            return InteractionResult::handled();
        }
        let committed = renamed.unwrap_or_else(|| path.clone());
        self.focus_path(&committed);
        InteractionResult::with_action(WidgetAction::EditCommitted { path: committed })
            .push(WidgetAction::ValueChanged)
    }
}

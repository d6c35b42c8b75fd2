pub mod input_event;

pub use input_event::{KeyChord, KeyChordParseError, KeyCode, KeyEvent, KeyModifiers};

use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{Editor, Result};

pub struct LineReader {
    rl: Editor<(), FileHistory>,
    history_file: String,
}

impl Drop for LineReader {
    fn drop(&mut self) {
        self.rl.save_history(&self.history_file).ok();
    }
}

pub enum LineReadStatus {
    Line(String),
    Interrupted,
    Done,
}

impl LineReader {
    pub fn new(history_file: &str) -> Result<LineReader> {
        let mut rl = Editor::<(), FileHistory>::new()?;
        rl.load_history(history_file).ok();
        Ok(LineReader {
            rl,
            history_file: history_file.into(),
        })
    }

    pub fn readline(&mut self, prompt: &str) -> LineReadStatus {
        match self.rl.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.rl.add_history_entry(line.as_str()).ok();
                }
                LineReadStatus::Line(line)
            }
            Err(ReadlineError::Interrupted) => LineReadStatus::Interrupted,
            Err(ReadlineError::Eof) => LineReadStatus::Done,
            Err(err) => {
                tracing::warn!(error = %err, "line editor failed");
                LineReadStatus::Done
            }
        }
    }
}

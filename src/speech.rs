use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

/// Speaks finished words through an external text-to-speech program.
#[derive(Clone, Debug, Default)]
pub struct Pronouncer {
    argv: Option<Vec<String>>,
}

impl Pronouncer {
    pub fn new(argv: Option<Vec<String>>) -> Self {
        Self {
            argv: argv.filter(|argv| !argv.is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.argv.is_some()
    }

    /// Spawn the command with `word` as its last argument. Returns whether
    /// the process started; it is never waited on by the caller.
    pub fn speak(&self, word: &str) -> bool {
        let Some((program, args)) = self.argv.as_deref().and_then(|argv| argv.split_first())
        else {
            return false;
        };
        let spawned = Command::new(program)
            .args(args)
            .arg(word)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(mut child) => {
                thread::spawn(move || {
                    let _ = child.wait();
                });
                true
            }
            Err(err) => {
                debug!(program, %err, "speech command failed to start");
                false
            }
        }
    }
}

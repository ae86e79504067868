/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

/// Transient, non-blocking user-facing notices. The client decides when a
/// notice fires and at what level; presentation belongs to the caller's
/// environment.
pub trait Notifier {
    fn notify(&self, level: Level, message: &str);

    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }

    fn info(&self, message: &str) {
        self.notify(Level::Info, message);
    }
}

/// Terminal presentation: one line per notice, errors on stderr.
#[derive(Debug, Clone, Copy)]
pub struct Console;

impl Notifier for Console {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Success => println!("ok: {message}"),
            Level::Error => eprintln!("error: {message}"),
            Level::Info => println!("{message}"),
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use std::sync::{Arc, Mutex};

    use super::{Level, Notifier};

    /// Captures notices for assertions.
    #[derive(Clone, Default)]
    pub struct Recording {
        notices: Arc<Mutex<Vec<(Level, String)>>>,
    }

    impl Recording {
        pub fn messages(&self) -> Vec<String> {
            self.notices
                .lock()
                .unwrap()
                .iter()
                .map(|(_, message)| message.clone())
                .collect()
        }

        pub fn errors(&self) -> Vec<String> {
            self.notices
                .lock()
                .unwrap()
                .iter()
                .filter(|(level, _)| *level == Level::Error)
                .map(|(_, message)| message.clone())
                .collect()
        }
    }

    impl Notifier for Recording {
        fn notify(&self, level: Level, message: &str) {
            self.notices.lock().unwrap().push((level, message.to_string()));
        }
    }
}

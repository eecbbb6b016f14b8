//! Test utilities
//!
//! Proptest generators and a scripted [`FakeInvoker`] for unit tests.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::core::invoker::{CommandOutput, Invoker};

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate a supported architecture suffix
    pub fn supported_arch() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("arm32v7".to_string()),
            Just("arm64".to_string()),
            Just("amd64".to_string()),
        ]
    }

    /// Generate an arbitrary definition-like name, dots included
    pub fn definition_name() -> impl Strategy<Value = String> {
        prop_oneof![
            supported_arch().prop_map(|arch| format!("Dockerfile.{arch}")),
            "[A-Za-z0-9]{1,12}\\.[a-z0-9]{0,8}",
            "[A-Za-z0-9.]{0,20}",
        ]
    }

    /// Generate a valid image name
    pub fn image_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,20}(/[a-z][a-z0-9-]{0,10})?"
    }

    /// Generate a valid image tag
    pub fn image_tag() -> impl Strategy<Value = String> {
        "[a-z0-9][a-z0-9._-]{0,15}"
    }
}

/// What a scripted rule does when it matches
#[derive(Debug, Clone)]
enum Action {
    Fail(String),
    SpawnError,
    Panic,
}

/// Scripted build tool
///
/// Records every call and an ordered start/end event log. Rules match on
/// a substring of the space-joined arguments; the first matching rule wins,
/// unmatched calls succeed.
#[derive(Debug, Default)]
pub struct FakeInvoker {
    rules: Vec<(String, Action)>,
    delay: Option<(String, Duration)>,
    calls: Mutex<Vec<Vec<String>>>,
    events: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail calls containing `pattern` with `stderr` as diagnostic
    #[must_use]
    pub fn fail_when(mut self, pattern: &str, stderr: &str) -> Self {
        self.rules
            .push((pattern.to_string(), Action::Fail(stderr.to_string())));
        self
    }

    /// Make calls containing `pattern` fail to spawn
    #[must_use]
    pub fn spawn_error_when(mut self, pattern: &str) -> Self {
        self.rules.push((pattern.to_string(), Action::SpawnError));
        self
    }

    /// Panic on calls containing `pattern`
    #[must_use]
    pub fn panic_when(mut self, pattern: &str) -> Self {
        self.rules.push((pattern.to_string(), Action::Panic));
        self
    }

    /// Sleep for `delay` on calls containing `pattern`
    #[must_use]
    pub fn delay_when(mut self, pattern: &str, delay: Duration) -> Self {
        self.delay = Some((pattern.to_string(), delay));
        self
    }

    /// All calls received so far, in arrival order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose joined arguments contain `pattern`
    pub fn calls_matching(&self, pattern: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|args| args.join(" "))
            .filter(|line| line.contains(pattern))
            .collect()
    }

    /// Ordered `start:<cmd>` / `end:<cmd>` log
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Highest number of calls observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Invoker for FakeInvoker {
    fn invoke(&self, args: &[String]) -> io::Result<CommandOutput> {
        let line = args.join(" ");
        self.calls.lock().unwrap().push(args.to_vec());
        self.events.lock().unwrap().push(format!("start:{line}"));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some((pattern, delay)) = &self.delay {
            if line.contains(pattern.as_str()) {
                std::thread::sleep(*delay);
            }
        }

        let action = self
            .rules
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, action)| action.clone());

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.events.lock().unwrap().push(format!("end:{line}"));

        match action {
            None => Ok(CommandOutput::ok()),
            Some(Action::Fail(stderr)) => Ok(CommandOutput::failed(stderr)),
            Some(Action::SpawnError) => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No such file or directory",
            )),
            Some(Action::Panic) => panic!("scripted panic for '{line}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::config::defaults::MIN_PROPTEST_ITERATIONS;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fake_invoker_first_rule_wins() {
        let invoker = FakeInvoker::new()
            .fail_when("manifest push", "first")
            .fail_when("manifest", "second");
        let out = invoker
            .invoke(&["manifest".to_string(), "push".to_string()])
            .unwrap();
        assert_eq!(out.diagnostic(), "first");
    }

    #[test]
    fn test_fake_invoker_records_events() {
        let invoker = FakeInvoker::new();
        invoker.invoke(&["push".to_string(), "a".to_string()]).unwrap();
        assert_eq!(invoker.events(), vec!["start:push a", "end:push a"]);
        assert_eq!(invoker.max_in_flight(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(MIN_PROPTEST_ITERATIONS))]

        #[test]
        fn test_supported_arch_generator(arch in supported_arch()) {
            prop_assert!(["arm32v7", "arm64", "amd64"].contains(&arch.as_str()));
        }

        #[test]
        fn test_image_tag_generator(tag in image_tag()) {
            prop_assert!(!tag.is_empty());
            prop_assert!(!tag.contains(char::is_whitespace));
        }
    }
}

//! Session behaviour through the public API, against scripted classifiers.

use std::sync::{Arc, Mutex};
use std::thread;

use spamcheck::classifier::{Classifier, ClassifierError, Label};
use spamcheck::session::{
    SessionHistory, SessionManager, SessionSettings, SessionState, SessionStats, SubmissionError,
};

/// Labels a message spam when it contains `"!"`; logs call order.
#[derive(Default)]
struct Scripted {
    calls: Mutex<Vec<String>>,
}

impl Classifier for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn predict(&self, text: &str) -> Result<Label, ClassifierError> {
        self.calls.lock().unwrap().push(text.to_string());
        Ok(if text.contains('!') { Label::Spam } else { Label::NotSpam })
    }
}

/// Unavailable until `available` is flipped.
struct Flaky {
    available: Mutex<bool>,
}

impl Classifier for Flaky {
    fn name(&self) -> &str {
        "flaky"
    }

    fn predict(&self, _text: &str) -> Result<Label, ClassifierError> {
        if *self.available.lock().unwrap() {
            Ok(Label::NotSpam)
        } else {
            Err(ClassifierError::ArtifactMissing("model.json".into()))
        }
    }
}

fn session(classifier: Arc<dyn Classifier>) -> SessionManager {
    SessionManager::new(classifier, SessionHistory::new(), SessionSettings::default())
}

fn assert_counters_consistent(m: &SessionManager) {
    let stats = m.stats();
    let all = m.recent_history(usize::MAX);
    assert_eq!(stats.spam + stats.ham, all.len() as u64);
    assert_eq!(stats.total, all.len() as u64);
    assert_eq!(stats.spam, all.iter().filter(|r| r.label() == Label::Spam).count() as u64);
}

#[test]
fn worked_examples() {
    let m = session(Arc::new(Scripted::default()));

    let spam = m.submit("Buy now!!! Limit offer!! Click the link immediately").unwrap();
    assert_eq!(spam.preview(), "Buy now!!! Limit offer!! Click...");
    assert_eq!(spam.label(), Label::Spam);
    assert_eq!(m.stats().spam, 1);

    let ham = m.submit("See you at 5").unwrap();
    assert_eq!(ham.preview(), "See you at 5");
    assert_eq!(ham.label(), Label::NotSpam);
    assert_eq!(m.stats(), SessionStats { total: 2, spam: 1, ham: 1 });

    assert_counters_consistent(&m);
}

#[test]
fn preview_length_rule() {
    let m = session(Arc::new(Scripted::default()));

    let long: String = "0123456789".repeat(5)[..45].to_string();
    let r = m.submit(&long).unwrap();
    assert_eq!(r.preview().chars().count(), 33);
    assert!(r.preview().starts_with(&long[..30]));

    let short = "twenty chars exactly";
    assert_eq!(short.chars().count(), 20);
    assert_eq!(m.submit(short).unwrap().preview(), short);
}

#[test]
fn whitespace_only_never_reaches_classifier() {
    let scripted = Arc::new(Scripted::default());
    let m = session(scripted.clone());
    m.submit("hello").unwrap();
    let before = m.stats();

    for input in ["", " ", "\t\n", "\u{3000}"] {
        assert_eq!(m.submit(input).unwrap_err(), SubmissionError::EmptyMessage);
    }

    assert_eq!(m.stats(), before);
    assert_eq!(scripted.calls.lock().unwrap().len(), 1);
}

#[test]
fn recent_history_is_newest_first_and_stable() {
    let m = session(Arc::new(Scripted::default()));
    for i in 0..5 {
        m.submit(&format!("message {i}")).unwrap();
    }

    let first = m.recent_history(3);
    let second = m.recent_history(3);
    assert_eq!(first, second);
    let previews: Vec<_> = first.iter().map(|r| r.preview().to_string()).collect();
    assert_eq!(previews, ["message 4", "message 3", "message 2"]);

    assert_eq!(m.recent_history(50).len(), 5);
    assert!(m.recent_history(0).is_empty());
}

#[test]
fn unavailable_classifier_is_recoverable() {
    let flaky = Arc::new(Flaky { available: Mutex::new(false) });
    let m = session(flaky.clone());

    let err = m.submit("hello").unwrap_err();
    assert!(matches!(err, SubmissionError::ClassifierUnavailable(_)));
    assert_eq!(m.state(), SessionState::Empty);

    *flaky.available.lock().unwrap() = true;
    assert!(m.submit("hello").is_ok());
    assert_eq!(m.state(), SessionState::HasHistory);
}

#[test]
fn state_machine_with_reset() {
    let m = session(Arc::new(Scripted::default()));
    assert_eq!(m.state(), SessionState::Empty);

    m.submit("a!").unwrap();
    m.submit("b").unwrap();
    assert_eq!(m.state(), SessionState::HasHistory);

    m.reset();
    let once = (m.state(), m.stats(), m.recent_history(10));
    m.reset();
    let twice = (m.state(), m.stats(), m.recent_history(10));
    assert_eq!(once, twice);
    assert_eq!(once.0, SessionState::Empty);
    assert_eq!(once.1, SessionStats::default());
}

#[test]
fn concurrent_submissions_keep_order_and_counts() {
    let scripted = Arc::new(Scripted::default());
    let m = Arc::new(session(scripted.clone()));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let m = Arc::clone(&m);
            thread::spawn(move || {
                for i in 0..25 {
                    let msg = if i % 3 == 0 { format!("t{t} m{i}!") } else { format!("t{t} m{i}") };
                    m.submit(&msg).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(m.stats().total, 200);
    assert_counters_consistent(&m);

    // History order (oldest first) equals the order labels were obtained.
    let mut history: Vec<_> = m
        .recent_history(usize::MAX)
        .into_iter()
        .map(|r| r.preview().to_string())
        .collect();
    history.reverse();
    assert_eq!(history, *scripted.calls.lock().unwrap());
}

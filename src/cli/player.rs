//! Drives the search animation of a session on a pacer.

use tracing::{debug, instrument};

use crate::application::{Session, TickOutcome};
use crate::infrastructure::Pacer;

/// Tick the running animation until it completes, waiting the session's
/// interval before every tick. Returns the number of ticks delivered.
#[instrument(level = "debug", skip_all)]
pub fn play(session: &mut Session, pacer: &dyn Pacer, mut on_tick: impl FnMut(TickOutcome)) -> usize {
    let mut ticks = 0;
    while let Some(ticket) = session.active_ticket() {
        pacer.wait(session.tick_interval());
        let outcome = session.tick(ticket);
        ticks += 1;
        on_tick(outcome);
    }
    debug!("animation played in {} tick(s)", ticks);
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingPacer {
        waits: Mutex<Vec<Duration>>,
    }

    impl Pacer for RecordingPacer {
        fn wait(&self, delay: Duration) {
            if let Ok(mut waits) = self.waits.lock() {
                waits.push(delay);
            }
        }
    }

    #[test]
    fn given_found_search_when_played_then_steps_end_on_target() {
        let mut session = Session::default();
        session.seed(&["10", "5", "3"]).expect("seed");
        session.request_search("3");
        assert_eq!(session.highlight(), Some(10));

        let pacer = RecordingPacer::default();
        let mut seen = Vec::new();
        let ticks = play(&mut session, &pacer, |outcome| seen.push(outcome));

        assert_eq!(ticks, 3);
        assert_eq!(
            seen,
            vec![
                TickOutcome::Highlight(5),
                TickOutcome::Highlight(3),
                TickOutcome::Finished(Some(3))
            ]
        );
        let waits = pacer.waits.lock().expect("lock");
        assert!(waits.iter().all(|d| *d == Duration::from_millis(550)));
        assert_eq!(session.highlight(), Some(3));
        assert!(!session.is_animating());
    }

    #[test]
    fn given_no_animation_when_played_then_no_ticks() {
        let mut session = Session::default();
        let pacer = RecordingPacer::default();
        assert_eq!(play(&mut session, &pacer, |_| {}), 0);
        assert!(pacer.waits.lock().expect("lock").is_empty());
    }
}

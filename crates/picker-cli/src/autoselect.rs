//! The picker prompt: wait for the user's choice while counting down to an
//! automatic selection of the default profile.

use std::io::BufRead;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

/// What the user (or the clock) decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Zero-based index into the listed entries
    Entry(usize),
    /// Enter on an empty line, or no input available at all
    Default,
    /// The countdown ran out
    TimedOut,
    Abort,
}

/// Interpret one line of input against a list of `count` entries.
///
/// Returns `None` for input that selects nothing, so the prompt can ask again.
pub fn parse_choice(line: &str, count: usize) -> Option<Choice> {
    let line = line.trim();
    if line.is_empty() {
        return Some(Choice::Default);
    }
    if line.eq_ignore_ascii_case("q") {
        return Some(Choice::Abort);
    }

    match line.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(Choice::Entry(n - 1)),
        _ => None,
    }
}

/// Forward stdin lines into a channel from a blocking thread
pub fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(8);

    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    rx
}

/// Wait for a choice.
///
/// Input is polled before the clock, so a choice typed in the same instant
/// the countdown expires still wins. `on_tick` receives the seconds left
/// after each elapsed second and `on_invalid` each rejected line. Without a
/// timeout the prompt waits indefinitely. Closed input selects the default.
pub async fn run(
    mut input: mpsc::Receiver<String>,
    count: usize,
    timeout: Option<Duration>,
    mut on_tick: impl FnMut(u64),
    mut on_invalid: impl FnMut(&str),
) -> Choice {
    let deadline = timeout.map(|t| Instant::now() + t);
    let mut remaining = timeout.map_or(0, |t| t.as_secs());
    let mut ticker = time::interval_at(Instant::now() + Duration::from_secs(1), Duration::from_secs(1));

    let expired = async {
        match deadline {
            Some(deadline) => time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(expired);

    loop {
        tokio::select! {
            biased;

            line = input.recv() => match line {
                Some(line) => match parse_choice(&line, count) {
                    Some(choice) => return choice,
                    None => on_invalid(line.as_str()),
                },
                None => {
                    tracing::debug!("Input closed, selecting the default profile");
                    return Choice::Default;
                }
            },

            _ = ticker.tick(), if deadline.is_some() && remaining > 0 => {
                remaining -= 1;
                on_tick(remaining);
            }

            _ = &mut expired => return Choice::TimedOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("", 3), Some(Choice::Default));
        assert_eq!(parse_choice("  \n", 3), Some(Choice::Default));
        assert_eq!(parse_choice("q", 3), Some(Choice::Abort));
        assert_eq!(parse_choice("Q", 3), Some(Choice::Abort));
        assert_eq!(parse_choice("1", 3), Some(Choice::Entry(0)));
        assert_eq!(parse_choice(" 3 ", 3), Some(Choice::Entry(2)));
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("firefox", 3), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_expires() {
        let (_tx, rx) = mpsc::channel(1);
        let ticks = RefCell::new(Vec::new());

        let choice = run(
            rx,
            2,
            Some(Duration::from_secs(3)),
            |left| ticks.borrow_mut().push(left),
            |_| {},
        )
        .await;

        assert_eq!(choice, Choice::TimedOut);
        assert_eq!(*ticks.borrow(), vec![2, 1, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_cancels_countdown() {
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(1500)).await;
            tx.send("2".to_string()).await.unwrap();
            // Keep the sender alive past the deadline
            time::sleep(Duration::from_secs(30)).await;
        });

        let start = Instant::now();
        let choice = run(rx, 2, Some(Duration::from_secs(5)), |_| {}, |_| {}).await;

        assert_eq!(choice, Choice::Entry(1));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_input_is_reported_and_ignored() {
        let (tx, rx) = mpsc::channel(4);
        tx.send("9".to_string()).await.unwrap();
        tx.send("nope".to_string()).await.unwrap();
        tx.send("q".to_string()).await.unwrap();
        let rejected = RefCell::new(Vec::new());

        let choice = run(rx, 2, None, |_| {}, |line| rejected.borrow_mut().push(line.to_string())).await;

        assert_eq!(choice, Choice::Abort);
        assert_eq!(*rejected.borrow(), vec!["9", "nope"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_without_timeout_waits_for_input() {
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(async move {
            time::sleep(Duration::from_secs(600)).await;
            tx.send(String::new()).await.unwrap();
        });

        let ticks = RefCell::new(0);
        let choice = run(rx, 1, None, |_| *ticks.borrow_mut() += 1, |_| {}).await;

        assert_eq!(choice, Choice::Default);
        assert_eq!(*ticks.borrow(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_input_selects_default() {
        let (tx, rx) = mpsc::channel::<String>(1);
        drop(tx);

        let choice = run(rx, 3, Some(Duration::from_secs(10)), |_| {}, |_| {}).await;
        assert_eq!(choice, Choice::Default);
    }
}

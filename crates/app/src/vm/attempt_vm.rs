use services::{AttemptCommand, AttemptPhase, AttemptSnapshot, Notice, NoticeLevel};

use super::time_fmt::format_clock;

/// One line of keyboard input on the attempt screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(AttemptCommand),
    Quit,
}

pub const INPUT_HELP: &str = "keys: <number> select, n next, p previous, s submit, q quit";

#[must_use]
pub fn parse_input(line: &str) -> Option<Input> {
    let command = match line.trim() {
        "n" => AttemptCommand::Next,
        "p" => AttemptCommand::Previous,
        "s" => AttemptCommand::Submit,
        "q" => return Some(Input::Quit),
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => AttemptCommand::SelectOption(n - 1),
            _ => return None,
        },
    };
    Some(Input::Command(command))
}

/// How much of the screen a new snapshot invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Full,
    Timer,
    Skip,
}

#[must_use]
pub fn redraw(prev: Option<&AttemptSnapshot>, next: &AttemptSnapshot) -> Redraw {
    let Some(prev) = prev else {
        return Redraw::Full;
    };
    let same_screen = prev.phase == next.phase
        && prev.submission == next.submission
        && prev.index == next.index
        && prev.total == next.total
        && prev.selected == next.selected
        && prev.needs_retry == next.needs_retry;
    if !same_screen {
        Redraw::Full
    } else if prev.remaining_secs != next.remaining_secs && announces(next.remaining_secs) {
        Redraw::Timer
    } else {
        Redraw::Skip
    }
}

// Whole minutes, then every second of the last ten.
fn announces(remaining_secs: u64) -> bool {
    remaining_secs <= 10 || remaining_secs % 60 == 0
}

/// Share of the session time already used, in whole percent.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn time_used_percent(snapshot: &AttemptSnapshot) -> u8 {
    if snapshot.total_secs == 0 {
        return 0;
    }
    let used = snapshot.total_secs.saturating_sub(snapshot.remaining_secs);
    (used.saturating_mul(100) / snapshot.total_secs).min(100) as u8
}

#[must_use]
pub fn timer_line(snapshot: &AttemptSnapshot) -> String {
    if snapshot.total_secs == 0 && snapshot.phase == AttemptPhase::Loading {
        return "Time left: --:--".into();
    }
    format!(
        "Time left: {} ({}% used)",
        format_clock(snapshot.remaining_secs),
        time_used_percent(snapshot)
    )
}

#[must_use]
pub fn render(snapshot: &AttemptSnapshot) -> Vec<String> {
    match snapshot.phase {
        AttemptPhase::Blocked => return vec!["This quiz has not been started on this device.".into()],
        AttemptPhase::Submitted => return vec!["Answers submitted.".into()],
        AttemptPhase::Loading if snapshot.total == 0 => return vec!["Loading quiz...".into()],
        _ => {}
    }

    let mut lines = vec![
        format!(
            "Question {} of {} ({} answered)",
            snapshot.index + 1,
            snapshot.total,
            snapshot.answered
        ),
        timer_line(snapshot),
    ];
    if let Some(question) = &snapshot.question {
        lines.push(String::new());
        lines.push(question.prompt().to_owned());
        for (i, option) in question.options().iter().enumerate() {
            let mark = if snapshot.selected.as_deref() == Some(option.as_str()) {
                'x'
            } else {
                ' '
            };
            lines.push(format!("  [{mark}] {}. {option}", i + 1));
        }
    }
    lines.push(String::new());
    if snapshot.needs_retry {
        lines.push("Time is up and the automatic submission failed. Press s to retry.".into());
    } else if snapshot.submission.is_in_flight() {
        lines.push("Submitting...".into());
    } else if snapshot.phase == AttemptPhase::Expiring {
        lines.push("Time is up.".into());
    } else {
        lines.push(INPUT_HELP.into());
    }
    lines
}

#[must_use]
pub fn notice_line(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
    };
    format!("[{tag}] {}", notice.message)
}

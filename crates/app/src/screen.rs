//! Terminal attempt screen: stdin commands in, rendered snapshots out.

use std::io::BufRead;

use tokio::sync::mpsc;
use tracing::debug;

use services::{
    AttemptCommand, AttemptController, AttemptEvent, AttemptSnapshot, RunOutcome, run_attempt,
};

use crate::vm::{INPUT_HELP, Input, Redraw, notice_line, parse_input, redraw, render, timer_line};

const COMMAND_BUFFER: usize = 16;

/// Mount the attempt screen and block until it is submitted, blocked or quit.
///
/// # Errors
///
/// Returns an error if the runner task panicked.
pub async fn run_attempt_screen(
    controller: AttemptController,
) -> Result<RunOutcome, tokio::task::JoinError> {
    let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (event_tx, mut events) = mpsc::unbounded_channel();
    let runner = tokio::spawn(run_attempt(controller, command_rx, event_tx));

    // Blocking stdin reads cannot be cancelled; keep them off the runtime.
    std::thread::spawn(move || read_commands(&commands));

    let mut last: Option<AttemptSnapshot> = None;
    while let Some(event) = events.recv().await {
        match event {
            AttemptEvent::Notice(notice) => println!("{}", notice_line(&notice)),
            AttemptEvent::Updated(snapshot) => {
                match redraw(last.as_ref(), &snapshot) {
                    Redraw::Full => {
                        println!();
                        for line in render(&snapshot) {
                            println!("{line}");
                        }
                    }
                    Redraw::Timer => println!("{}", timer_line(&snapshot)),
                    Redraw::Skip => {}
                }
                last = Some(snapshot);
            }
        }
    }

    runner.await
}

fn read_commands(commands: &mpsc::Sender<AttemptCommand>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        match parse_input(&line) {
            Some(Input::Command(command)) => {
                if commands.blocking_send(command).is_err() {
                    break;
                }
            }
            Some(Input::Quit) => break,
            None if line.trim().is_empty() => {}
            None => println!("{INPUT_HELP}"),
        }
    }
    debug!("attempt input closed");
}

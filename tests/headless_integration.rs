use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use examr::bank::QuestionBank;
use examr::exam::{AutoConfirm, ExamSession};
use examr::runtime::{AppEvent, Runner, SessionTimer};

// Headless integration using the internal runtime + ExamSession without a TTY.
// Keys pick options by position; ticks feed a 10ms session clock.
fn drive(
    session: &mut ExamSession,
    timer: &mut SessionTimer,
    runner: &mut Runner<mpsc::Receiver<AppEvent>>,
    max_steps: u32,
) {
    for _ in 0..max_steps {
        match runner.step().unwrap() {
            AppEvent::Tick => {
                if !session.is_active() {
                    timer.disarm();
                }
                for _ in 0..timer.advance(Duration::from_millis(10)) {
                    session.tick();
                }
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    let position = c.to_digit(10).unwrap() as usize - 1;
                    session.select_current(position).unwrap();
                }
                KeyCode::Right => {
                    session.next();
                }
                KeyCode::Enter => {
                    session.submit(&mut AutoConfirm);
                    timer.disarm();
                }
                _ => {}
            },
        }
    }
}

fn send(tx: &mpsc::Sender<AppEvent>, code: KeyCode) {
    tx.send(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
        .unwrap();
}

#[test]
fn headless_exam_flow_completes() {
    let bank = QuestionBank::embedded().unwrap();
    let exam = Rc::clone(&bank.sets()[0]);
    let mut session = ExamSession::start(exam).unwrap();
    let mut timer = SessionTimer::new(Duration::from_millis(10));
    timer.arm();

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::with_tick_rate(rx, Duration::from_millis(1));

    // answer every question with its first option, then submit
    for _ in 0..session.question_count() {
        send(&tx, KeyCode::Char('1'));
        send(&tx, KeyCode::Right);
    }
    send(&tx, KeyCode::Enter);

    drive(&mut session, &mut timer, &mut runner, 50);

    assert!(session.is_review());
    assert_eq!(session.answered_count(), session.question_count());
    assert!(!timer.is_armed());
    let score = session.score();
    assert_eq!(score.total, session.question_count());
    assert!(score.percentage <= 100);
}

#[test]
fn headless_clock_only_runs_while_active() {
    let bank = QuestionBank::embedded().unwrap();
    let mut session = ExamSession::start(Rc::clone(&bank.sets()[0])).unwrap();
    let mut timer = SessionTimer::new(Duration::from_millis(10));
    timer.arm();

    let (tx, rx) = mpsc::channel::<AppEvent>();
    let mut runner = Runner::with_tick_rate(rx, Duration::from_millis(1));

    // no input: every step is a tick worth one clock period
    drive(&mut session, &mut timer, &mut runner, 5);
    assert_eq!(session.elapsed_secs(), 5);

    send(&tx, KeyCode::Enter);
    drive(&mut session, &mut timer, &mut runner, 5);
    assert!(session.is_review());
    assert_eq!(session.elapsed_secs(), 5);
}

/*!
 * Integration tests for the session command loop
 */

use std::time::Duration;
use tokio::sync::mpsc;
use tokio_test::assert_ok;

use cipherpad::services::HistoryStore;
use cipherpad::session::{Direction, Session, SessionCommand};

use crate::common::harness;

#[tokio::test(start_paused = true)]
async fn test_run_editThenShutdown_shouldReturnTransformedSession() {
    let h = harness(Session::default());
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(h.session.run(rx));

    tx.send(SessionCommand::Edit("hi".to_string())).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    tx.send(SessionCommand::Shutdown).await.unwrap();

    let session = assert_ok!(task.await);
    assert_eq!(session, Session::new("hi", "aGk=", Direction::Encode));
    assert_eq!(h.transformer.request_count(), 1);
    assert_eq!(h.history.entries().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_run_commandsWithinQuietPeriod_shouldSendOneRequest() {
    let h = harness(Session::default());
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(h.session.run(rx));

    tx.send(SessionCommand::Edit("aGk=".to_string())).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    tx.send(SessionCommand::SetDirection(Direction::Decode)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    tx.send(SessionCommand::CopyTranslated).await.unwrap();
    drop(tx);

    let session = assert_ok!(task.await);
    assert_eq!(session.translated_text, "hi");
    assert_eq!(h.transformer.request_count(), 1);
    assert_eq!(h.clipboard.writes(), vec!["hi".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_run_clearBeforeExpiry_shouldSendNothing() {
    let h = harness(Session::default());
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(h.session.run(rx));

    tx.send(SessionCommand::Edit("hello".to_string())).await.unwrap();
    tx.send(SessionCommand::Clear).await.unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;
    tx.send(SessionCommand::Shutdown).await.unwrap();

    let session = assert_ok!(task.await);
    assert_eq!(session, Session::default());
    assert_eq!(h.transformer.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_run_restoreCommand_shouldApplySelection() {
    let h = harness(Session::default());
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(h.session.run(rx));

    let selected = Session::new("hello", "aGVsbG8=", Direction::Encode);
    tx.send(SessionCommand::Restore(selected.clone())).await.unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;
    tx.send(SessionCommand::Shutdown).await.unwrap();

    let session = assert_ok!(task.await);
    assert_eq!(session, selected);
    assert_eq!(h.transformer.request_count(), 0);
}

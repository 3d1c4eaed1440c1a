/*!
 * Tests for restoring sessions from history, share ids and share links
 */

use std::time::Duration;

use cipherpad::services::mock::{MockShareResolver, MockTransformer};
use cipherpad::session::{Direction, Notice, Session, ShareSnapshot};

use crate::common::{harness, harness_with};

#[tokio::test(start_paused = true)]
async fn test_restore_withTranslation_shouldIssueNoRequest() {
    let mut h = harness(Session::default());

    h.session.restore(Session::new("hello", "aGVsbG8=", Direction::Encode));

    assert!(!h.session.timer_armed());
    assert!(!h.session.provenance_pending());
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(h.transformer.request_count(), 0);
    assert_eq!(h.session.translated(), "aGVsbG8=");
}

#[tokio::test(start_paused = true)]
async fn test_restore_withoutTranslation_shouldIssueExactlyOneRequest() {
    let mut h = harness(Session::default());

    h.session.restore(Session::new("aGVsbG8=", "", Direction::Decode));
    assert!(!h.session.provenance_pending());
    h.session.settle().await;

    let requests = h.transformer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].direction, Direction::Decode);
    assert_eq!(requests[0].original_text, "aGVsbG8=");
    assert_eq!(h.session.translated(), "hello");
}

#[tokio::test(start_paused = true)]
async fn test_restore_withTranslation_shouldCancelPendingTimer() {
    let mut h = harness(Session::default());
    h.session.set_original("typing");
    assert!(h.session.timer_armed());

    h.session.restore(Session::new("hello", "aGVsbG8=", Direction::Encode));

    assert!(!h.session.timer_armed());
    h.session.settle().await;
    assert_eq!(h.transformer.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_restore_thenEdit_shouldTreatEditAsLive() {
    let mut h = harness(Session::default());
    h.session.restore(Session::new("hello", "aGVsbG8=", Direction::Encode));

    h.session.set_original("hello!");
    h.session.settle().await;

    assert_eq!(h.transformer.request_count(), 1);
    assert_eq!(h.session.translated(), "aGVsbG8h");
}

#[tokio::test(start_paused = true)]
async fn test_restore_thenClear_shouldClearTranslation() {
    let mut h = harness(Session::default());
    h.session.restore(Session::new("hello", "aGVsbG8=", Direction::Encode));

    h.session.clear();

    assert_eq!(h.session.translated(), "");
    assert_eq!(h.share.last(), Some(None));
}

#[tokio::test(start_paused = true)]
async fn test_restore_emptySession_shouldKeepBuffersEmpty() {
    let mut h = harness(Session::new("hello", "aGVsbG8=", Direction::Decode));

    h.session.restore(Session::default());

    assert_eq!(h.session.session(), Session::default());
    assert!(!h.session.timer_armed());
    assert_eq!(h.share.last(), Some(None));
}

#[tokio::test(start_paused = true)]
async fn test_restore_emptyOriginalWithTranslation_shouldKeepTranslation() {
    let mut h = harness(Session::default());

    h.session.restore(Session::new("", "x", Direction::Encode));

    assert_eq!(h.session.session(), Session::new("", "x", Direction::Encode));
    assert!(!h.session.timer_armed());
    assert!(!h.session.provenance_pending());
    assert_eq!(h.share.last(), Some(Some(ShareSnapshot::new("", Direction::Encode))));

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(h.transformer.request_count(), 0);
    assert_eq!(h.session.translated(), "x");
}

#[tokio::test(start_paused = true)]
async fn test_restore_emptyOriginalWithTranslationThenSwap_shouldClearTranslation() {
    let mut h = harness(Session::default());
    h.session.restore(Session::new("", "x", Direction::Encode));

    h.session.swap();

    assert_eq!(h.session.session(), Session::new("", "", Direction::Decode));
    assert!(!h.session.timer_armed());
    assert_eq!(h.share.last(), Some(None));
    h.session.settle().await;
    assert_eq!(h.transformer.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_restore_emptyOriginalWithTranslationThenDirectionEdit_shouldClearTranslation() {
    let mut h = harness(Session::default());
    h.session.restore(Session::new("", "x", Direction::Encode));

    h.session.set_direction(Direction::Decode);

    assert_eq!(h.session.session(), Session::new("", "", Direction::Decode));
    assert!(!h.session.timer_armed());
    assert_eq!(h.share.last(), Some(None));
}

#[tokio::test(start_paused = true)]
async fn test_initialSelection_withTranslation_shouldPublishShareWithoutRequest() {
    let h = harness(Session::new("hello", "aGVsbG8=", Direction::Encode));

    assert_eq!(h.share.updates(), vec![Some(ShareSnapshot::new("hello", Direction::Encode))]);
    assert!(!h.session.timer_armed());
    assert_eq!(h.transformer.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_initialSelection_default_shouldPublishNone() {
    let h = harness(Session::default());

    assert_eq!(h.share.updates(), vec![None]);
}

#[tokio::test(start_paused = true)]
async fn test_openShare_knownId_shouldRestoreAndRequest() {
    let resolver = MockShareResolver::new().with_share("abc", ShareSnapshot::new("aGk=", Direction::Decode));
    let mut h = harness_with(MockTransformer::working(), resolver, Session::default());

    assert!(h.session.open_share("abc").await);
    assert_eq!(h.session.original(), "aGk=");
    assert_eq!(h.session.direction(), Direction::Decode);
    assert_eq!(h.session.translated(), "");

    h.session.settle().await;
    assert_eq!(h.transformer.request_count(), 1);
    assert_eq!(h.session.translated(), "hi");
    assert_eq!(h.share.last(), Some(Some(ShareSnapshot::new("aGk=", Direction::Decode))));
}

#[tokio::test(start_paused = true)]
async fn test_openShare_unknownId_shouldNotifyAndLeaveDefaults() {
    let mut h = harness(Session::default());

    assert!(!h.session.open_share("missing").await);

    assert_eq!(h.session.session(), Session::default());
    assert_eq!(
        h.notifier.notices(),
        vec![Notice::Error("Share missing not found".to_string())]
    );
    assert!(!h.session.timer_armed());
}

#[tokio::test(start_paused = true)]
async fn test_openShareLink_shouldRestoreFromQuery() {
    let mut h = harness(Session::default());

    assert!(h.session.open_share_link("https://mindall.herokuapp.com/?t=aGk%3D&d=1"));
    assert_eq!(h.session.original(), "aGk=");
    assert_eq!(h.session.direction(), Direction::Decode);

    h.session.settle().await;
    assert_eq!(h.session.translated(), "hi");
}

#[tokio::test(start_paused = true)]
async fn test_openShareLink_malformed_shouldNotify() {
    let mut h = harness(Session::default());

    assert!(!h.session.open_share_link("https://mindall.herokuapp.com/?d=1"));
    assert_eq!(h.notifier.notices().len(), 1);
    assert_eq!(h.session.session(), Session::default());
}

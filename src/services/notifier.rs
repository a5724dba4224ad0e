/// Periodic notification fan-out
///
/// Best-effort delivery of one personalized pick per enabled user. A
/// failure for one recipient is logged and never aborts the batch.
use crate::{
    bot::transport::ChatTransport,
    bot::view,
    db::PreferenceStore,
    error::AppResult,
    models::{ContentType, Frequency},
    services::selector::RecommendationSelector,
};
use chrono::{Datelike, NaiveDate, Utc, Weekday};
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;

/// Whether a user with this frequency is due on the given date. The
/// fan-out runs on a daily tick: weekly users fire on Friday, monthly
/// users on the first of the month.
pub fn is_due(frequency: Frequency, date: NaiveDate) -> bool {
    match frequency {
        Frequency::Daily => true,
        Frequency::Weekly => date.weekday() == Weekday::Fri,
        Frequency::Monthly => date.day() == 1,
    }
}

/// Outcome counts for one fan-out batch
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FanoutReport {
    pub delivered: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Delivers one pick to every enabled, due user.
///
/// Content type is chosen at random among the types the user's preference
/// allows; the pick is the top of the selector's returned page.
pub async fn run_fanout(
    selector: &RecommendationSelector,
    preferences: &dyn PreferenceStore,
    transport: &dyn ChatTransport,
    today: NaiveDate,
) -> AppResult<FanoutReport> {
    let users = preferences.enabled_users().await?;
    let mut report = FanoutReport::default();

    for (user_id, pref) in users {
        if !is_due(pref.frequency, today) {
            report.skipped += 1;
            continue;
        }

        let content_type: ContentType = {
            let mut rng = rand::thread_rng();
            match pref.content_filter.allowed_types().choose(&mut rng) {
                Some(ct) => *ct,
                None => continue,
            }
        };

        match deliver_one(selector, transport, user_id, content_type).await {
            Ok(true) => report.delivered += 1,
            Ok(false) => {
                tracing::debug!(user_id, "No pick available for notification");
                report.skipped += 1;
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Notification delivery failed");
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        delivered = report.delivered,
        failed = report.failed,
        skipped = report.skipped,
        "Notification fan-out completed"
    );

    Ok(report)
}

async fn deliver_one(
    selector: &RecommendationSelector,
    transport: &dyn ChatTransport,
    user_id: i64,
    content_type: ContentType,
) -> AppResult<bool> {
    let picks = selector.select_page(content_type, None).await?;
    let Some(pick) = picks.first() else {
        return Ok(false);
    };

    let card = view::notification_card(pick);
    transport.send(user_id, &card).await?;
    Ok(true)
}

/// Spawns the daily tick that drives the fan-out. The first tick fires
/// after a full interval, not at startup.
pub fn spawn_notification_loop(
    selector: RecommendationSelector,
    preferences: Arc<dyn PreferenceStore>,
    transport: Arc<dyn ChatTransport>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(24 * 60 * 60));
        interval.tick().await; // immediate first tick, skip it

        loop {
            interval.tick().await;
            let today = Utc::now().date_naive();
            if let Err(e) = run_fanout(&selector, preferences.as_ref(), transport.as_ref(), today).await
            {
                tracing::error!(error = %e, "Notification fan-out aborted");
            }
        }
    })
}

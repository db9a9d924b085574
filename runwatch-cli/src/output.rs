//! Terminal output helpers

use chrono::{DateTime, Utc};
use colored::*;
use runwatch_core::domain::run::{LifecycleState, RunRecord};

/// Orders runs the way the monitor picks the latest one
pub fn sort_newest_first(runs: &mut [RunRecord]) {
    runs.sort_by_key(|r| std::cmp::Reverse((r.start_time, r.run_id)));
}

/// Colorize a lifecycle state for display
pub fn colorize_state(state: LifecycleState) -> ColoredString {
    let label = state.as_str();
    match state {
        LifecycleState::Running | LifecycleState::Terminating => label.cyan(),
        LifecycleState::Queued
        | LifecycleState::Pending
        | LifecycleState::Blocked
        | LifecycleState::WaitingForRetry => label.yellow(),
        LifecycleState::Terminated => label.green(),
        LifecycleState::InternalError => label.red(),
        LifecycleState::Skipped | LifecycleState::Unknown => label.dimmed(),
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Print a one-block run summary
pub fn print_run_summary(run: &RunRecord) {
    println!("  {} Run {}", "▸".cyan(), run.run_id.to_string().dimmed());
    println!("    Job:     {}", run.job_id.to_string().dimmed());
    println!("    State:   {}", colorize_state(run.lifecycle_state));
    if let Some(result) = run.result_state {
        println!("    Result:  {:?}", result);
    }
    println!("    Started: {}", format_time(run.start_time).dimmed());
    if let Some(user) = &run.creator_user_name {
        println!("    Creator: {}", user.dimmed());
    }
    println!();
}

/// Print detailed run information
pub fn print_run_details(run: &RunRecord) {
    println!("{}", "Run Details:".bold());
    println!("  Run ID:      {}", run.run_id.to_string().cyan());
    println!("  Job ID:      {}", run.job_id.to_string().dimmed());
    if run.is_retry() {
        println!("  First try:   {}", run.original_attempt_run_id);
    }
    println!("  State:       {}", colorize_state(run.lifecycle_state));

    if let Some(result) = run.result_state {
        let label = format!("{:?}", result);
        println!(
            "  Result:      {}",
            if result.is_success() {
                label.green()
            } else {
                label.red()
            }
        );
    }

    println!("  Started:     {}", format_time(run.start_time));

    if let Some(ended) = run.end_time {
        println!("  Ended:       {}", ended.format("%Y-%m-%d %H:%M:%S"));

        if let Some(started) = run.start_time {
            let seconds = ended.signed_duration_since(started).num_seconds();
            println!("  Duration:    {}s", seconds);
        }
    }

    if let Some(user) = &run.creator_user_name {
        println!("  Creator:     {}", user);
    }

    if let Some(message) = &run.state_message {
        println!("\n{}", "Message:".bold());
        println!("{}", message);
    }

    if let Some(url) = &run.run_page_url {
        println!("\n  {}", url.underline());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runwatch_core::domain::job::JobId;
    use runwatch_core::domain::run::{RunId, latest_run};

    fn run(run_id: i64, start_ms: Option<i64>) -> RunRecord {
        RunRecord {
            job_id: JobId(1),
            run_id: RunId(run_id),
            original_attempt_run_id: RunId(run_id),
            lifecycle_state: LifecycleState::Terminated,
            result_state: None,
            state_message: None,
            start_time: start_ms.and_then(DateTime::from_timestamp_millis),
            end_time: None,
            creator_user_name: None,
            run_page_url: None,
        }
    }

    #[test]
    fn test_sort_matches_latest_run() {
        let mut runs = vec![
            run(1, Some(100)),
            run(5, None),
            run(3, Some(300)),
            run(2, Some(300)),
        ];
        let latest = latest_run(&runs).unwrap().run_id;

        sort_newest_first(&mut runs);

        let order: Vec<i64> = runs.iter().map(|r| r.run_id.0).collect();
        assert_eq!(order, vec![3, 2, 1, 5]);
        assert_eq!(runs[0].run_id, latest);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(None), "-");
        assert_eq!(
            format_time(DateTime::from_timestamp_millis(0)),
            "1970-01-01 00:00:00"
        );
    }
}

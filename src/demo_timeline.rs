use chrono::{Duration, TimeZone, Utc};
use timeline::{Commit, DateRange, PointRole, PullRequest, TimelineEngine};

fn main() {
    println!("Timeline Lanes Demo");
    println!("===================\n");

    let Some(start) = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).single() else {
        eprintln!("Error building demo start date");
        return;
    };
    let as_of = start + Duration::days(13);
    let range = match DateRange::new(start, as_of) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error building date range: {}", e);
            return;
        }
    };

    // four overlapping PRs, one merged
    let merged_101 = start + Duration::hours(150);
    let pull_requests: Vec<PullRequest> = [
        (101, "feature/search", "Add full-text search", Some(merged_101)),
        (102, "feature/export", "Export timeline as CSV", None),
        (103, "fix/login", "Fix login redirect", None),
        (104, "feature/theme", "Dark theme", None),
    ]
    .into_iter()
    .map(|(number, head, title, merged_at)| {
        let pr = PullRequest::new(number)
            .with_title(title)
            .with_head_ref(head)
            .with_base_ref("develop");
        match merged_at {
            Some(at) => pr.merged(Some("m101"), at),
            None => pr,
        }
    })
    .collect();
    let mut commits = Vec::new();
    for (offset, pr) in pull_requests.iter().enumerate() {
        for step in 0..3 {
            let hours = 10 + offset as i64 * 14 + step * 30;
            commits.push(
                Commit::new(
                    format!("{}-{}", pr.number, step),
                    format!("Work on {} (#{})", pr.branch_label(), pr.number),
                    start + Duration::hours(hours),
                )
                .with_author("demo"),
            );
        }
    }
    commits.push(
        Commit::new("m101", "Merge pull request #101 from org/feature/search", merged_101)
            .with_parents(["101-2", "base"]),
    );
    commits.push(Commit::new("hotfix", "Quick fix/typo in README", start + Duration::hours(200)));
    commits.push(Commit::new("bump", "Bump version to 1.4.0", start + Duration::hours(220)));

    let graph = TimelineEngine::default().layout(&commits, &pull_requests, "develop", &range, as_of);

    let stats = graph.stats();
    println!("Timeline statistics:");
    println!("  Points: {}", stats.total_points);
    println!("  Lines: {}", stats.total_lines);
    println!("  Lanes: {}", stats.lanes);
    println!("  PR merges: {}", stats.pr_merges);
    println!();

    println!("Pull requests:");
    for pr in &pull_requests {
        let state = if pr.is_merged() { "merged" } else { "open" };
        println!(
            "  #{} {:<24} {} -> {} ({})",
            pr.number,
            pr.title,
            pr.branch_label(),
            pr.base_ref.as_deref().unwrap_or("?"),
            state
        );
    }
    println!();

    println!("Points by row:");
    println!("──────────────");
    let mut points: Vec<_> = graph.points.iter().collect();
    points.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    for point in points {
        let what = match &point.role {
            PointRole::Commit { .. } => "commit",
            PointRole::BranchOut { .. } => "branch-out",
            PointRole::BranchTip { .. } => "open tip",
            PointRole::PrMerge { .. } => "merge",
            PointRole::WeeklySource { .. } | PointRole::WeeklyMerge { .. } => "weekly (synthetic)",
            PointRole::Boundary => "boundary",
        };
        let detail = match &point.commit {
            Some(commit) if commit.is_merge() => format!("{} (merge) {}", commit.short_sha(), commit.summary()),
            Some(commit) => format!("{} {}", commit.short_sha(), commit.summary()),
            None => String::new(),
        };
        println!(
            "  y={:>6.0} x={:>4.0}  {:<18} {:<16} {}",
            point.y,
            point.x,
            what,
            point.branch_name.as_deref().unwrap_or(""),
            detail
        );
    }
}

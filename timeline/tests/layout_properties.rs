use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use timeline::core::{BOUNDARY_IDS, Track};
use timeline::{
    layout, Commit, DateRange, Error, LayoutConfig, LineType, PointRole, PullRequest, TimelineEngine,
};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, day, hour, 0, 0).unwrap()
}

/// Tue 1 Oct .. Sun 6 Oct 2024, no Monday inside
fn weekdays_only() -> DateRange {
    DateRange::new(at(1, 0), at(6, 0)).unwrap()
}

fn sample_history() -> (Vec<Commit>, Vec<PullRequest>) {
    let prs = vec![
        PullRequest::new(42)
            .with_head_ref("feature/x")
            .merged(Some("m42"), at(9, 10)),
        PullRequest::new(43).with_head_ref("fix/crash").merged(None, at(4, 18)),
        PullRequest::new(44).with_head_ref("feature/open"),
    ];
    let commits = vec![
        Commit::new("c1", "Scaffold (#42)", at(2, 9)),
        Commit::new("c2", "Crash fix (#43)", at(3, 11)),
        Commit::new("c3", "Bump version", at(3, 15)),
        Commit::new("c4", "More work (#42)", at(5, 16)),
        Commit::new("c5", "Start (#44)", at(7, 8)),
        Commit::new("c6", "wip on branch/spike", at(8, 12)),
        Commit::new("m42", "Merge pull request #42 from org/feature/x", at(9, 10))
            .with_parents(["c6", "c4"]),
        Commit::new("ancient", "Before the window (#42)", at(1, 0) - Duration::days(3)),
        Commit::new("future", "After the window", at(30, 0)),
    ];
    (commits, prs)
}

fn fortnight() -> DateRange {
    DateRange::new(at(1, 0), at(14, 0)).unwrap()
}

#[test]
fn empty_input_gives_labels_only() {
    let week = DateRange::new(at(1, 0), at(8, 0)).unwrap();
    let graph = layout(&[], &[], "develop", &week, at(8, 0));

    assert!(graph.points.is_empty());
    assert!(graph.lines.is_empty());
    // both endpoints are labelled
    assert_eq!(graph.time_labels.len(), 8);
    assert_eq!(graph.height, 800.0);
}

#[test]
fn merged_pr_draws_fork_chain_and_merge() {
    let prs = vec![PullRequest::new(42).with_head_ref("feature/x").merged(None, at(5, 12))];
    let commits = vec![
        Commit::new("a", "Add model (#42)", at(2, 0)),
        Commit::new("b", "Add view (#42)", at(3, 0)),
        Commit::new("c", "Add tests (#42)", at(4, 0)),
    ];
    let graph = layout(&commits, &prs, "develop", &weekdays_only(), at(6, 0));

    let branch_out: Vec<_> = graph
        .points
        .iter()
        .filter(|p| matches!(p.role, PointRole::BranchOut { .. }))
        .collect();
    assert_eq!(branch_out.len(), 1);
    assert_eq!(branch_out[0].x, 150.0);

    let branch_lines: Vec<_> = graph.lines.iter().filter(|l| l.line_type == LineType::Branch).collect();
    assert_eq!(branch_lines.len(), 1);
    assert_eq!(branch_lines[0].from.id, branch_out[0].id);
    assert_eq!(branch_lines[0].to.id, "a");

    let commit_ids: HashSet<&str> = ["a", "b", "c"].into_iter().collect();
    let in_lane: Vec<_> = graph
        .lines
        .iter()
        .filter(|l| {
            l.line_type == LineType::Straight
                && commit_ids.contains(l.from.id.as_str())
                && commit_ids.contains(l.to.id.as_str())
        })
        .collect();
    assert_eq!(in_lane.len(), 2);
    for id in ["a", "b", "c"] {
        let point = graph.point(id).unwrap();
        assert_eq!(point.x, 250.0);
        assert_eq!(point.branch_name.as_deref(), Some("feature/x"));
    }

    let merges: Vec<_> = graph.points.iter().filter(|p| p.is_pr()).collect();
    assert_eq!(merges.len(), 1);
    assert_eq!(merges[0].pr_number(), Some(42));
    assert_eq!(merges[0].x, 150.0);
    assert_eq!(merges[0].y, 40.0 + 4.5 * 100.0);
    let incoming: Vec<_> = graph.lines_into(&merges[0].id).collect();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].line_type, LineType::Merge);
    assert_eq!(incoming[0].from.id, "c");
}

#[test]
fn message_alone_does_not_invent_a_pr() {
    let commits = vec![Commit::new("a", "Merge pull request #7 from org/feature/y", at(2, 0))];
    let graph = layout(&commits, &[], "develop", &weekdays_only(), at(6, 0));

    let point = graph.point("a").unwrap();
    assert_eq!(point.branch().map(|b| b.name.as_str()), Some("y"));
    assert_eq!(point.pr_number(), None);
    assert!(graph.points.iter().all(|p| !p.is_pr()));
}

#[test]
fn fourth_concurrent_pr_reuses_lane_zero() {
    // listed out of order; lanes follow start dates
    let prs: Vec<PullRequest> = (1..=4).rev().map(PullRequest::new).collect();
    let commits: Vec<Commit> = (1..=4u64)
        .map(|n| Commit::new(format!("c{}", n), format!("Work (#{})", n), at(2, n as u32)))
        .collect();
    let graph = layout(&commits, &prs, "develop", &weekdays_only(), at(6, 0));

    let xs: Vec<f64> = (1..=4).map(|n| graph.point(&format!("c{}", n)).unwrap().x).collect();
    assert_eq!(xs, vec![250.0, 310.0, 370.0, 250.0]);
    assert_eq!(graph.lane_count, 3);

    // all four stay open until as-of
    let tips = graph.points.iter().filter(|p| matches!(p.role, PointRole::BranchTip { .. })).count();
    assert_eq!(tips, 4);
}

#[test]
fn lane_budget_follows_config() {
    let engine = TimelineEngine::new(LayoutConfig {
        max_concurrent_lanes: 2,
        ..LayoutConfig::default()
    })
    .unwrap();
    let prs: Vec<PullRequest> = (1..=3).map(PullRequest::new).collect();
    let commits: Vec<Commit> = (1..=3u64)
        .map(|n| Commit::new(format!("c{}", n), format!("Work (#{})", n), at(2, n as u32)))
        .collect();
    let graph = engine.layout(&commits, &prs, "develop", &weekdays_only(), at(6, 0));

    assert_eq!(graph.point("c3").unwrap().x, 250.0);
}

#[test]
fn commits_outside_window_never_drawn() {
    let (commits, prs) = sample_history();
    let range = fortnight();
    let graph = layout(&commits, &prs, "develop", &range, at(14, 0));

    let outside: HashSet<&str> = commits
        .iter()
        .filter(|c| !range.contains(c.date))
        .map(|c| c.sha.as_str())
        .collect();
    assert_eq!(outside.len(), 2);
    assert!(graph
        .points
        .iter()
        .filter_map(|p| p.commit_sha())
        .all(|sha| !outside.contains(sha)));
}

#[test]
fn one_label_per_day() {
    for days in [0i64, 1, 6, 7, 30, 92] {
        let range = DateRange::new(at(1, 0), at(1, 0) + Duration::days(days)).unwrap();
        let graph = layout(&[], &[], "main", &range, range.end());
        assert_eq!(graph.time_labels.len() as i64, days + 1, "{} day range", days);
    }
}

#[test]
fn every_line_endpoint_resolves() {
    let (commits, prs) = sample_history();
    let graph = layout(&commits, &prs, "develop", &fortnight(), at(14, 0));

    let ids: HashSet<&str> = graph.points.iter().map(|p| p.id.as_str()).chain(BOUNDARY_IDS).collect();
    for line in &graph.lines {
        assert!(ids.contains(line.from.id.as_str()), "dangling from {}", line.from.id);
        assert!(ids.contains(line.to.id.as_str()), "dangling to {}", line.to.id);
    }
    assert!(graph.unresolved_endpoints().is_empty());

    let unique: HashSet<&str> = graph.points.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(unique.len(), graph.points.len());
}

#[test]
fn each_merged_pr_has_one_merge_point() {
    let (commits, prs) = sample_history();
    let range = fortnight();
    let graph = layout(&commits, &prs, "develop", &range, at(14, 0));

    for pr in prs.iter().filter(|pr| pr.merged_at.is_some_and(|at| range.contains(at))) {
        let points: Vec<_> = graph
            .points
            .iter()
            .filter(|p| p.is_pr() && p.pr_number() == Some(pr.number))
            .collect();
        assert_eq!(points.len(), 1, "PR #{}", pr.number);

        let merges = graph
            .lines_into(&points[0].id)
            .filter(|l| l.line_type == LineType::Merge)
            .count();
        assert_eq!(merges, 1, "PR #{}", pr.number);
    }
    assert_eq!(graph.stats().pr_merges, 2);
}

#[test]
fn same_input_same_output() {
    let (commits, prs) = sample_history();
    let first = layout(&commits, &prs, "develop", &fortnight(), at(14, 0));
    let second = layout(&commits, &prs, "develop", &fortnight(), at(14, 0));

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn as_of_moves_only_open_lanes() {
    let (commits, prs) = sample_history();
    let early = layout(&commits, &prs, "develop", &fortnight(), at(10, 0));
    let late = layout(&commits, &prs, "develop", &fortnight(), at(12, 0));

    let tip_early = early.point("branch-tip-pr-44").unwrap();
    let tip_late = late.point("branch-tip-pr-44").unwrap();
    assert_eq!(tip_late.y - tip_early.y, 200.0);
    assert_eq!(early.point("merge-42"), late.point("merge-42"));
}

#[test]
fn y_follows_date_order() {
    let (commits, prs) = sample_history();
    let graph = layout(&commits, &prs, "develop", &fortnight(), at(14, 0));

    let mut commit_points: Vec<_> = graph
        .points
        .iter()
        .filter(|p| matches!(p.role, PointRole::Commit { .. }))
        .map(|p| (p.commit.as_ref().unwrap().date, p.y))
        .collect();
    commit_points.sort_by(|a, b| a.0.cmp(&b.0));
    for pair in commit_points.windows(2) {
        assert!(pair[0].1 <= pair[1].1);
        if pair[0].0 == pair[1].0 {
            assert_eq!(pair[0].1, pair[1].1);
        }
    }
}

#[test]
fn fixed_lanes_stay_apart_from_feature_lanes() {
    let (commits, prs) = sample_history();
    let graph = layout(&commits, &prs, "develop", &fortnight(), at(14, 0));

    for point in &graph.points {
        match &point.role {
            PointRole::Commit { track: Track::Feature(_) } | PointRole::BranchTip { .. } => {
                assert!(point.x >= 250.0);
            }
            PointRole::WeeklyMerge { .. } => assert_eq!(point.x, 50.0),
            _ => assert_eq!(point.x, 150.0, "{}", point.id),
        }
    }
}

#[test]
fn weekly_markers_are_flagged_synthetic() {
    let (commits, prs) = sample_history();
    let graph = layout(&commits, &prs, "develop", &fortnight(), at(14, 0));

    // Mondays 7 and 14 October
    let synthetic: Vec<_> = graph.points.iter().filter(|p| p.is_synthetic()).collect();
    assert_eq!(synthetic.len(), 4);
    assert!(synthetic.iter().all(|p| p.commit.is_none() && !p.is_pr()));
    assert!(graph.point("weekly-merge-2024-10-07").is_some());
    assert!(graph.point("weekly-merge-2024-10-14").is_some());
}

#[test]
fn inverted_range_is_rejected() {
    let err = DateRange::new(at(8, 0), at(1, 0)).unwrap_err();
    assert!(matches!(err, Error::InvertedRange { .. }));
}

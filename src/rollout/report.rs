//! Rollout report generation.

use super::policy::PolicyKind;
use crate::env::StepInfo;
use crate::game::EndCause;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of one evaluated episode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub seed: u64,
    pub score: u32,
    pub episode_return: f64,
    pub ticks: u64,
    pub flaps: u64,
    pub flap_ratio: f64,
    pub end_cause: Option<EndCause>,
}

impl EpisodeSummary {
    /// Build from the info of an episode's final step.
    pub fn from_info(seed: u64, info: &StepInfo) -> Self {
        Self {
            seed,
            score: info.score,
            episode_return: info.episode_return,
            ticks: info.tick,
            flaps: info.flaps,
            flap_ratio: info.flap_ratio,
            end_cause: info.end_cause,
        }
    }

    fn cause_label(&self) -> String {
        self.end_cause
            .map(|cause| cause.to_string())
            .unwrap_or_else(|| "unfinished".to_string())
    }
}

/// Aggregated results from a batch of episodes.
#[derive(Debug, Clone, Serialize)]
pub struct RolloutReport {
    pub policy: PolicyKind,
    pub episodes: u32,

    pub mean_score: f64,
    pub min_score: u32,
    pub max_score: u32,
    pub mean_return: f64,
    pub mean_ticks: f64,
    pub mean_flap_ratio: f64,

    /// Episodes per end cause, keyed by its display name
    pub end_causes: BTreeMap<String, u32>,

    /// Highest-scoring episode; ties go to the earliest
    pub best_episode: Option<EpisodeSummary>,

    pub runs: Vec<EpisodeSummary>,
}

impl RolloutReport {
    pub fn from_episodes(policy: PolicyKind, runs: Vec<EpisodeSummary>) -> Self {
        let episodes = runs.len() as u32;
        let n = episodes.max(1) as f64;

        let mean_score = runs.iter().map(|r| r.score as f64).sum::<f64>() / n;
        let min_score = runs.iter().map(|r| r.score).min().unwrap_or(0);
        let max_score = runs.iter().map(|r| r.score).max().unwrap_or(0);
        let mean_return = runs.iter().map(|r| r.episode_return).sum::<f64>() / n;
        let mean_ticks = runs.iter().map(|r| r.ticks as f64).sum::<f64>() / n;
        let mean_flap_ratio = runs.iter().map(|r| r.flap_ratio).sum::<f64>() / n;

        let mut end_causes = BTreeMap::new();
        for run in &runs {
            *end_causes.entry(run.cause_label()).or_insert(0) += 1;
        }

        let best_episode = runs
            .iter()
            .fold(None::<&EpisodeSummary>, |best, run| match best {
                Some(b) if b.score >= run.score => Some(b),
                _ => Some(run),
            })
            .cloned();

        Self {
            policy,
            episodes,
            mean_score,
            min_score,
            max_score,
            mean_return,
            mean_ticks,
            mean_flap_ratio,
            end_causes,
            best_episode,
            runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                       ROLLOUT REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Policy: {}, {} episodes\n\n",
            self.policy, self.episodes
        ));

        report.push_str("── SCORE ────────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Mean Score:      {:.2}\n", self.mean_score));
        report.push_str(&format!("  Min Score:       {}\n", self.min_score));
        report.push_str(&format!("  Max Score:       {}\n", self.max_score));
        report.push_str(&format!("  Mean Return:     {:.2}\n", self.mean_return));
        report.push_str(&format!("  Mean Length:     {:.1} ticks\n", self.mean_ticks));
        report.push_str(&format!(
            "  Mean Flap Rate:  {:.1}%\n\n",
            self.mean_flap_ratio * 100.0
        ));

        report.push_str("── END CAUSES ───────────────────────────────────────────────────\n");
        for (cause, count) in &self.end_causes {
            let pct = *count as f64 / self.episodes.max(1) as f64 * 100.0;
            let bar = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  {:<18} {:>5.1}% {}\n", cause, pct, bar));
        }
        report.push('\n');

        if let Some(best) = &self.best_episode {
            report.push_str("── BEST EPISODE ─────────────────────────────────────────────────\n");
            report.push_str(&format!(
                "  Seed {}: score {}, {} ticks, return {:.2}, ended by {}\n",
                best.seed,
                best.score,
                best.ticks,
                best.episode_return,
                best.cause_label()
            ));
        }

        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::CollisionKind;

    fn summary(seed: u64, score: u32, cause: EndCause) -> EpisodeSummary {
        EpisodeSummary {
            seed,
            score,
            episode_return: score as f64,
            ticks: 100 + score as u64 * 36,
            flaps: 10,
            flap_ratio: 0.1,
            end_cause: Some(cause),
        }
    }

    #[test]
    fn test_aggregates() {
        let report = RolloutReport::from_episodes(
            PolicyKind::GapFollower,
            vec![
                summary(0, 2, EndCause::Collision(CollisionKind::Pipe)),
                summary(1, 6, EndCause::ScoreLimit),
                summary(2, 6, EndCause::ScoreLimit),
                summary(3, 0, EndCause::Collision(CollisionKind::Ground)),
            ],
        );
        assert_eq!(report.episodes, 4);
        assert_eq!(report.mean_score, 3.5);
        assert_eq!(report.min_score, 0);
        assert_eq!(report.max_score, 6);
        assert_eq!(report.end_causes["score_limit"], 2);
        assert_eq!(report.end_causes["collision:pipe"], 1);
        assert_eq!(report.best_episode.as_ref().map(|b| b.seed), Some(1));
    }

    #[test]
    fn test_empty_report() {
        let report = RolloutReport::from_episodes(PolicyKind::Noop, Vec::new());
        assert_eq!(report.mean_score, 0.0);
        assert!(report.best_episode.is_none());
        assert!(report.to_text().contains("0 episodes"));
    }

    #[test]
    fn test_text_and_json() {
        let report = RolloutReport::from_episodes(
            PolicyKind::Random,
            vec![summary(9, 1, EndCause::Collision(CollisionKind::Ceiling))],
        );
        let text = report.to_text();
        assert!(text.contains("Policy: random"));
        assert!(text.contains("collision:ceiling"));
        assert!(text.contains("Seed 9"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["policy"], "random");
        assert_eq!(json["runs"][0]["end_cause"]["with"], "ceiling");
    }
}

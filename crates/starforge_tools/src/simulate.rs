//! Headless turn simulator.

use std::path::Path;

use serde::Serialize;
use starforge_core::components::CivId;
use starforge_core::context::GameContext;
use starforge_core::data::Scenario;
use starforge_core::turn::TurnSummary;

use crate::Result;

/// Outcome of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Turns processed.
    pub turns: u64,
    /// Final state hash.
    pub state_hash: u64,
    /// Per-turn summaries; quiet turns are left out.
    pub summaries: Vec<TurnSummary>,
    /// Situation reports delivered to the civilizations, oldest first.
    pub news: Vec<String>,
    /// Final state of every slot.
    pub slots: Vec<SlotReport>,
}

/// Final state of a single slot.
#[derive(Debug, Clone, Serialize)]
pub struct SlotReport {
    /// Production center name.
    pub center: String,
    /// Slot index.
    pub slot: usize,
    /// Design under construction.
    pub project: Option<String>,
    /// Completion in percent.
    pub percent: u32,
    /// Items still queued.
    pub queued: usize,
}

fn slot_reports(ctx: &GameContext) -> Vec<SlotReport> {
    let mut reports = Vec::new();
    for center in ctx.centers() {
        for (index, slot) in center.slots().iter().enumerate() {
            let design = slot
                .project()
                .and_then(|p| ctx.designs().get(p.design()).map(|d| (p, d)));
            let percent = design
                .map(|(p, d)| (p.percent_complete(d) * 100).to_num::<u32>())
                .unwrap_or_default();
            reports.push(SlotReport {
                center: center.name.clone(),
                slot: index,
                project: design.map(|(_, d)| d.name.clone()),
                percent,
                queued: slot.queue_len(),
            });
        }
    }
    reports
}

/// Process `turns` turns of an already built context.
pub fn run(ctx: &mut GameContext, turns: u64) -> SimulationReport {
    let mut summaries = Vec::new();
    let mut news = Vec::new();
    for _ in 0..turns {
        let summary = ctx.process_turn();
        drain_news(ctx, summary.turn, &mut news);
        if !summary.is_quiet() {
            summaries.push(summary);
        }
    }

    SimulationReport {
        turns: ctx.turn(),
        state_hash: ctx.state_hash(),
        summaries,
        news,
        slots: slot_reports(ctx),
    }
}

fn drain_news(ctx: &mut GameContext, turn: u64, out: &mut Vec<String>) {
    let ids: Vec<CivId> = ctx.civilizations().iter().map(|c| c.id).collect();
    for id in ids {
        let Some(civ) = ctx.civilizations_mut().get_mut(id) else {
            continue;
        };
        for entry in civ.take_sitreps() {
            out.push(format!("turn {turn}: {}: {}", civ.name, entry.summary()));
        }
    }
}

/// Load a scenario file and run it.
pub fn run_scenario(path: &Path, turns: u64) -> Result<SimulationReport> {
    let mut ctx = Scenario::load(path)?.build()?;
    tracing::info!(scenario = %path.display(), turns, "Running scenario");
    Ok(run(&mut ctx, turns))
}

/// Render a report for humans.
#[must_use]
pub fn render_text(report: &SimulationReport) -> String {
    let mut out = String::new();
    for summary in &report.summaries {
        for done in &summary.completed {
            out.push_str(&format!(
                "turn {:>3}: center {} slot {} completed design {}\n",
                summary.turn, done.slot.center.0, done.slot.slot, done.slot.design.0
            ));
        }
        for short in &summary.shortages {
            out.push_str(&format!(
                "turn {:>3}: center {} slot {} short {} {}\n",
                summary.turn, short.slot.center.0, short.slot.slot, short.shortfall, short.resource
            ));
        }
    }
    for line in &report.news {
        out.push_str(line);
        out.push('\n');
    }
    for slot in &report.slots {
        out.push_str(&format!(
            "{} #{}: {} ({}%), {} queued\n",
            slot.center,
            slot.slot,
            slot.project.as_deref().unwrap_or("idle"),
            slot.percent,
            slot.queued
        ));
    }
    out.push_str(&format!(
        "{} turns, state hash {:016x}\n",
        report.turns, report.state_hash
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use starforge_core::config::BuildRules;
    use starforge_test_utils::fixtures::busy_context;

    #[test]
    fn test_run_reports_slots() {
        let mut ctx = busy_context(BuildRules::default());
        let report = run(&mut ctx, 4);

        assert_eq!(report.turns, 4);
        assert_eq!(report.slots.len(), 3);
        assert_eq!(report.slots[0].center, "Earth");
        assert!(report.summaries.iter().any(|s| s.turn == 4 && !s.completed.is_empty()));

        let text = render_text(&report);
        assert!(text.contains("completed design 1"));
        assert!(text.contains("4 turns"));
        assert!(report
            .news
            .iter()
            .any(|line| line == "turn 4: Federation: Frigate completed at (4, 5)"));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let mut ctx = busy_context(BuildRules::default());
        let report = run(&mut ctx, 2);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["turns"], 2);
        assert!(json["slots"].is_array());
    }
}

//! Deterministic sample portfolio
//!
//! Used when no data files are supplied, so every view has something to show.
//! The generator is seeded, so the same start month always produces the same
//! records.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::{AllocationRecord, Phase, Portfolio, ProjectMeta, YearMonth};

/// Seed used by [`sample_portfolio`]
pub const SAMPLE_SEED: u64 = 7;

/// Months generated per project
pub const SAMPLE_MONTHS: usize = 12;

/// Probability that a project is active in a given month
const ACTIVE_PROBABILITY: f64 = 0.45;

const SAMPLE_PROJECTS: [(&str, &str, f64); 11] = [
    ("BIORADAR", "SCI & ENG", 60.0),
    ("ENERGIZE", "DIGITAL", 40.0),
    ("FOODSAFER", "PMO", 35.0),
    ("GIANT LEAPS", "PMO", 50.0),
    ("IS2H4C", "SCI & ENG", 45.0),
    ("PATAFEST", "DIGITAL", 30.0),
    ("RECONSTRUCT", "PMO", 30.0),
    ("RESCHAPE", "DIGITAL", 55.0),
    ("SECUREFOOD", "PMO", 25.0),
    ("THESEUS", "SCI & ENG", 45.0),
    ("UP-SKILL", "PMO", 20.0),
];

const EFFORT_PATTERN: [u32; 6] = [2, 3, 6, 8, 3, 1];

const PHASE_PATTERN: [Phase; 6] = [
    Phase::Design,
    Phase::Planning,
    Phase::Development,
    Phase::Testing,
    Phase::Delivery,
    Phase::Planning,
];

fn employee_pool(department: &str) -> &'static [&'static str] {
    match department {
        "SCI & ENG" => &[
            "Dr. Sarah Chen",
            "Dr. James Wilson",
            "Dr. Maria Garcia",
            "Dr. Ahmed Hassan",
        ],
        "DIGITAL" => &["Alex Morgan", "Sofia Rodriguez", "Liam O'Brien", "Emma Thompson"],
        _ => &["Michael Stevens", "Rachel Green", "David Kim", "Jennifer Lee"],
    }
}

/// Generate the sample portfolio starting at `start`
pub fn sample_portfolio(start: YearMonth) -> Portfolio {
    sample_portfolio_with_seed(start, SAMPLE_SEED)
}

/// Generate a sample portfolio from an explicit seed
pub fn sample_portfolio_with_seed(start: YearMonth, seed: u64) -> Portfolio {
    let projects = SAMPLE_PROJECTS
        .iter()
        .map(|(id, dept, budget)| ProjectMeta::new(*id, *dept, *budget))
        .collect();

    let months = start.months(SAMPLE_MONTHS);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut allocations = Vec::new();

    for (project, department, _) in SAMPLE_PROJECTS {
        let pool = employee_pool(department);
        for (i, month) in months.iter().enumerate() {
            // Missing rows are idle months; nothing is stored for them
            if rng.random::<f64>() >= ACTIVE_PROBABILITY {
                continue;
            }
            let effort = EFFORT_PATTERN[i % EFFORT_PATTERN.len()];
            let phase = PHASE_PATTERN[i % PHASE_PATTERN.len()];

            let headcount = ((effort / 2).max(1) as usize).min(pool.len());
            let mut assigned: Vec<&str> = pool.choose_multiple(&mut rng, headcount).copied().collect();
            assigned.sort_unstable();

            let share = f64::from(effort) / headcount as f64;
            let annotation = assigned
                .iter()
                .map(|name| format!("{name} ({share:.1})"))
                .collect::<Vec<_>>()
                .join(", ");

            allocations.push(
                AllocationRecord::new(project, month.to_string(), f64::from(effort))
                    .phase(phase)
                    .employees(annotation),
            );
        }
    }

    Portfolio::new(projects, allocations)
}

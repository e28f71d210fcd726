use std::collections::HashSet;

use deadpool_postgres::Pool;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::catalog::{Career, CareerStatus};
use crate::repositories::catalog::{self as catalog_repo, SkillCount};
use crate::repositories::user as user_repo;

/// Only the ten most frequent skills of a cohort are considered.
const DISTRIBUTION_CAP: usize = 10;
/// The top `BOOSTED_RANKS` positions get their raw count multiplied by
/// `BOOSTED_RANKS - rank`; the rest of the capped distribution stays raw.
const BOOSTED_RANKS: usize = 5;

/// One skill in a cohort's weighted distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WeightedSkill {
    pub skill_id: i32,
    pub skill_name: String,
    pub raw_count: i64,
    pub weighted_count: i64,
}

/// Ranks a cohort's raw skill counts and applies the "balance" weighting.
///
/// Counts are ordered by raw count descending, ties broken by skill id so
/// the ranking is stable across calls. At most ten skills survive; ranks
/// 0..=4 are multiplied by 5, 4, 3, 2, 1 and ranks 5..=9 keep their raw
/// count. Cohorts with fewer than ten distinct skills simply stop early.
pub fn weigh(mut counts: Vec<SkillCount>) -> Vec<WeightedSkill> {
    counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.skill_id.cmp(&b.skill_id)));
    counts.truncate(DISTRIBUTION_CAP);

    counts
        .into_iter()
        .enumerate()
        .map(|(rank, entry)| {
            let factor = if rank < BOOSTED_RANKS {
                (BOOSTED_RANKS - rank) as i64
            } else {
                1
            };
            WeightedSkill {
                skill_id: entry.skill_id,
                skill_name: entry.skill_name,
                raw_count: entry.count,
                weighted_count: entry.count * factor,
            }
        })
        .collect()
}

/// The weighted overlap between a user's skill set and a cohort's
/// distribution, as a percentage rounded to two decimals.
///
/// An empty distribution (no students, or students with no skills) has no
/// meaningful overlap; it yields 0.0 rather than dividing by zero.
pub fn affinity_percentage(user_skill_ids: &HashSet<i32>, weighted: &[WeightedSkill]) -> f64 {
    let total: i64 = weighted.iter().map(|s| s.weighted_count).sum();
    if total == 0 {
        return 0.0;
    }

    let matched: i64 = weighted
        .iter()
        .filter(|s| user_skill_ids.contains(&s.skill_id))
        .map(|s| s.weighted_count)
        .sum();

    let percentage = matched as f64 / total as f64 * 100.0;
    (percentage * 100.0).round() / 100.0
}

/// A user's affinity with one cohort of a career.
#[derive(Debug, Serialize)]
pub struct CohortAffinity {
    pub status: CareerStatus,
    pub students: i64,
    pub distribution: Vec<WeightedSkill>,
    pub affinity_percentage: f64,
}

/// Computes the user's skill affinity against every cohort of a career.
///
/// One pipeline (count → rank → weigh → percentage), run once per status.
pub async fn compare_user_skills(
    pool: &Pool,
    user_id: i32,
    career_id: i32,
) -> Result<Vec<CohortAffinity>> {
    catalog_repo::find_career(pool, career_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let user_skills: HashSet<i32> = user_repo::skill_ids_for_user(pool, user_id)
        .await?
        .into_iter()
        .collect();

    let mut cohorts = Vec::with_capacity(CareerStatus::ALL.len());
    for status in CareerStatus::ALL {
        cohorts.push(cohort_affinity(pool, career_id, status, &user_skills).await?);
    }

    tracing::debug!(
        "Computed skill affinity for user {} against career {}",
        user_id,
        career_id
    );
    Ok(cohorts)
}

async fn cohort_affinity(
    pool: &Pool,
    career_id: i32,
    status: CareerStatus,
    user_skills: &HashSet<i32>,
) -> Result<CohortAffinity> {
    let students = catalog_repo::count_students(pool, career_id, status).await?;
    let distribution = weigh(catalog_repo::cohort_skill_counts(pool, career_id, status).await?);
    let affinity_percentage = affinity_percentage(user_skills, &distribution);

    Ok(CohortAffinity {
        status,
        students,
        distribution,
        affinity_percentage,
    })
}

/// Per-career figures used by the public comparison page.
#[derive(Debug, Serialize)]
pub struct CareerSummary {
    pub id: i32,
    pub name: String,
    pub faculty: String,
    pub description: Option<String>,
    pub semesters: i32,
    pub credits: i32,
    pub students: Vec<(CareerStatus, i64)>,
}

/// Gathers one career's comparison figures. The per-status counts come from
/// the same parameterized query for every cohort label.
pub async fn career_summary(pool: &Pool, career_id: i32) -> Result<CareerSummary> {
    let career: Career = catalog_repo::find_career(pool, career_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let faculty = catalog_repo::find_faculty(pool, career.faculty_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut students = Vec::with_capacity(CareerStatus::ALL.len());
    for status in CareerStatus::ALL {
        students.push((status, catalog_repo::count_students(pool, career_id, status).await?));
    }

    Ok(CareerSummary {
        id: career.id,
        name: career.name,
        faculty: faculty.name,
        description: career.description,
        semesters: career.semesters,
        credits: career.credits,
        students,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(skill_id: i32, count: i64) -> SkillCount {
        SkillCount {
            skill_id,
            skill_name: format!("skill-{}", skill_id),
            count,
        }
    }

    #[test]
    fn weighting_boosts_top_five_and_keeps_next_five_raw() {
        let counts = vec![
            count(1, 10),
            count(2, 8),
            count(3, 6),
            count(4, 4),
            count(5, 2),
            count(6, 1),
        ];

        let weighted: Vec<i64> = weigh(counts).iter().map(|s| s.weighted_count).collect();
        assert_eq!(weighted, vec![50, 32, 18, 8, 2, 1]);
    }

    #[test]
    fn distribution_is_capped_at_ten_skills() {
        let counts: Vec<SkillCount> = (1..=14).map(|i| count(i, 20 - i as i64)).collect();
        let weighted = weigh(counts);

        assert_eq!(weighted.len(), 10);
        assert_eq!(weighted[0].weighted_count, 19 * 5);
        assert_eq!(weighted[9].weighted_count, 10);
    }

    #[test]
    fn short_cohorts_are_not_zero_padded() {
        let weighted = weigh(vec![count(3, 4), count(9, 7)]);
        assert_eq!(weighted.len(), 2);
        // rank 0 gets ×5, rank 1 gets ×4
        assert_eq!(weighted[0].weighted_count, 35);
        assert_eq!(weighted[1].weighted_count, 16);
    }

    #[test]
    fn ties_rank_by_skill_id() {
        let weighted = weigh(vec![count(12, 5), count(3, 5), count(7, 5)]);
        let ids: Vec<i32> = weighted.iter().map(|s| s.skill_id).collect();
        assert_eq!(ids, vec![3, 7, 12]);
    }

    #[test]
    fn percentage_counts_only_held_skills() {
        let weighted = weigh(vec![
            count(1, 10),
            count(2, 8),
            count(3, 6),
            count(4, 4),
            count(5, 2),
            count(6, 1),
        ]);
        // total weight 111, user holds skills 1 and 6: 50 + 1 = 51
        let held: HashSet<i32> = [1, 6].into_iter().collect();
        assert_eq!(affinity_percentage(&held, &weighted), 45.95);
    }

    #[test]
    fn full_overlap_is_one_hundred_percent() {
        let weighted = weigh(vec![count(1, 3), count(2, 3)]);
        let held: HashSet<i32> = [1, 2].into_iter().collect();
        assert_eq!(affinity_percentage(&held, &weighted), 100.0);
    }

    #[test]
    fn empty_cohort_yields_sentinel_not_a_fault() {
        let held: HashSet<i32> = [1, 2, 3].into_iter().collect();
        assert_eq!(affinity_percentage(&held, &[]), 0.0);
    }

    #[test]
    fn no_overlap_is_zero() {
        let weighted = weigh(vec![count(1, 5)]);
        let held: HashSet<i32> = [99].into_iter().collect();
        assert_eq!(affinity_percentage(&held, &weighted), 0.0);
    }
}

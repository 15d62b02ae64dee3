//! Session sampling, diagnosis checking, and scoring.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use thiserror::Error;

use super::types::FaultScenario;

/// Number of faults in a standard training session.
pub const DEFAULT_SESSION_SIZE: usize = 7;

/// Errors raised while answering a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaultError {
    /// The chosen option id does not exist in the scenario.
    #[error("unknown diagnosis option \"{option_id}\" for scenario \"{scenario_id}\"")]
    UnknownOption {
        scenario_id: String,
        option_id: String,
    },

    /// The session has no scenario at this position.
    #[error("scenario position {index} out of range (session has {len})")]
    ScenarioOutOfRange { index: usize, len: usize },

    /// The scenario at this position has already been answered.
    #[error("scenario \"{scenario_id}\" has already been answered")]
    AlreadyAnswered { scenario_id: String },
}

/// Groups scenarios by circuit type, in order of first appearance.
///
/// Each bucket keeps its members in catalog order.
pub fn group_by_circuit_type(catalog: &[FaultScenario]) -> Vec<(&str, Vec<&FaultScenario>)> {
    let mut buckets: Vec<(&str, Vec<&FaultScenario>)> = Vec::new();
    for s in catalog {
        match buckets.iter_mut().find(|(t, _)| *t == s.circuit_type) {
            Some((_, members)) => members.push(s),
            None => buckets.push((s.circuit_type.as_str(), vec![s])),
        }
    }
    buckets
}

/// Picks up to `count` scenarios, one per circuit type, using `rng`.
///
/// One scenario is drawn uniformly from every circuit-type bucket, the
/// picks are shuffled, and the first `count` are kept. With fewer circuit
/// types than `count` the session is shorter; it is never padded.
///
/// # Examples
///
/// ```
/// use elec_trainer::faults::catalog::Catalog;
/// use elec_trainer::faults::session::pick_session_faults_with;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let catalog = Catalog::builtin().unwrap();
/// let mut rng = StdRng::seed_from_u64(7);
/// let session = pick_session_faults_with(catalog.scenarios(), 7, &mut rng);
/// assert_eq!(session.len(), 7);
/// ```
pub fn pick_session_faults_with<'a, R>(
    catalog: &'a [FaultScenario],
    count: usize,
    rng: &mut R,
) -> Vec<&'a FaultScenario>
where
    R: Rng + ?Sized,
{
    let mut selected: Vec<&FaultScenario> = group_by_circuit_type(catalog)
        .into_iter()
        .map(|(_, members)| members[rng.random_range(0..members.len())])
        .collect();

    selected.shuffle(rng);
    selected.truncate(count);

    tracing::debug!(
        requested = count,
        picked = selected.len(),
        "picked session faults"
    );
    selected
}

/// Picks a session with the thread-local system RNG.
pub fn pick_session_faults(catalog: &[FaultScenario], count: usize) -> Vec<&FaultScenario> {
    pick_session_faults_with(catalog, count, &mut rand::rng())
}

/// Returns whether `option_id` is the correct diagnosis for `scenario`.
///
/// # Errors
///
/// Returns [`FaultError::UnknownOption`] if the scenario has no such option.
pub fn validate_diagnosis(scenario: &FaultScenario, option_id: &str) -> Result<bool, FaultError> {
    scenario
        .option(option_id)
        .map(|o| o.is_correct)
        .ok_or_else(|| FaultError::UnknownOption {
            scenario_id: scenario.id.clone(),
            option_id: option_id.to_string(),
        })
}

/// A recorded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub option_id: String,
    pub correct: bool,
}

/// A picked session plus the answers given so far.
#[derive(Debug, Clone)]
pub struct TrainerSession<'a> {
    scenarios: Vec<&'a FaultScenario>,
    answers: Vec<Option<Answer>>,
}

impl<'a> TrainerSession<'a> {
    /// Wraps an already-picked list of scenarios.
    pub fn new(scenarios: Vec<&'a FaultScenario>) -> Self {
        let answers = vec![None; scenarios.len()];
        Self { scenarios, answers }
    }

    /// Picks a fresh session of up to `count` faults from `catalog`.
    pub fn start<R>(catalog: &'a [FaultScenario], count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(pick_session_faults_with(catalog, count, rng))
    }

    /// Scenarios in presentation order.
    pub fn scenarios(&self) -> &[&'a FaultScenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Answer recorded at `index`, if any.
    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.answers.get(index).and_then(Option::as_ref)
    }

    /// Returns `true` once every scenario has an answer.
    pub fn is_complete(&self) -> bool {
        self.answers.iter().all(Option::is_some)
    }

    /// Validates and records a diagnosis for the scenario at `index`.
    ///
    /// # Errors
    ///
    /// [`FaultError::ScenarioOutOfRange`] for a bad index,
    /// [`FaultError::AlreadyAnswered`] for a repeat answer, and
    /// [`FaultError::UnknownOption`] for an option id the scenario lacks.
    /// Nothing is recorded on error.
    pub fn submit(&mut self, index: usize, option_id: &str) -> Result<bool, FaultError> {
        let len = self.scenarios.len();
        let scenario = *self
            .scenarios
            .get(index)
            .ok_or(FaultError::ScenarioOutOfRange { index, len })?;

        if self.answers[index].is_some() {
            return Err(FaultError::AlreadyAnswered {
                scenario_id: scenario.id.clone(),
            });
        }

        let correct = validate_diagnosis(scenario, option_id)?;
        tracing::debug!(
            scenario = %scenario.id,
            option = option_id,
            correct,
            "diagnosis submitted"
        );

        self.answers[index] = Some(Answer {
            option_id: option_id.to_string(),
            correct,
        });
        Ok(correct)
    }

    /// Tally of the answers so far.
    pub fn score(&self) -> SessionScore {
        SessionScore {
            total: self.scenarios.len(),
            answered: self.answers.iter().flatten().count(),
            correct: self.answers.iter().flatten().filter(|a| a.correct).count(),
        }
    }
}

/// Session tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionScore {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
}

impl SessionScore {
    /// Correct answers as a percentage of the session size (0 for an empty session).
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.correct as f64 / self.total as f64
        }
    }
}

impl fmt::Display for SessionScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Session Score ---")?;
        writeln!(f, "Answered:  {}/{}", self.answered, self.total)?;
        write!(
            f,
            "Correct:   {}/{} ({:.0}%)",
            self.correct,
            self.total,
            self.percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faults::types::{DiagnosisOption, FaultKind};
    use rand::{SeedableRng, rngs::StdRng};

    fn scenario(id: &str, circuit_type: &str) -> FaultScenario {
        FaultScenario {
            id: id.into(),
            circuit_type: circuit_type.into(),
            circuit_name: circuit_type.into(),
            symptom: String::new(),
            fault_kind: FaultKind::OpenCircuit,
            test_points: Vec::new(),
            diagnosis_options: vec![
                DiagnosisOption {
                    id: "a".into(),
                    label: "wrong".into(),
                    is_correct: false,
                },
                DiagnosisOption {
                    id: "b".into(),
                    label: "right".into(),
                    is_correct: true,
                },
            ],
            correct_location: String::new(),
            rectification: String::new(),
            explanation: String::new(),
            optimal_method: String::new(),
        }
    }

    fn small_catalog() -> Vec<FaultScenario> {
        vec![
            scenario("r1", "ring"),
            scenario("l1", "lighting"),
            scenario("r2", "ring"),
            scenario("m1", "motor"),
        ]
    }

    #[test]
    fn grouping_preserves_first_appearance_and_member_order() {
        let cat = small_catalog();
        let groups = group_by_circuit_type(&cat);
        let keys: Vec<&str> = groups.iter().map(|(t, _)| *t).collect();
        assert_eq!(keys, vec!["ring", "lighting", "motor"]);
        let ring: Vec<&str> = groups[0].1.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ring, vec!["r1", "r2"]);
    }

    #[test]
    fn session_is_short_when_few_circuit_types() {
        let cat = small_catalog();
        let mut rng = StdRng::seed_from_u64(1);
        let picked = pick_session_faults_with(&cat, DEFAULT_SESSION_SIZE, &mut rng);
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn session_truncates_to_count() {
        let cat = small_catalog();
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(pick_session_faults_with(&cat, 2, &mut rng).len(), 2);
        assert!(pick_session_faults_with(&cat, 0, &mut rng).is_empty());
    }

    #[test]
    fn empty_catalog_gives_empty_session() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(pick_session_faults_with(&[], 7, &mut rng).is_empty());
        assert!(pick_session_faults(&[], 7).is_empty());
    }

    #[test]
    fn same_seed_same_session() {
        let cat = small_catalog();
        let ids = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            pick_session_faults_with(&cat, 7, &mut rng)
                .iter()
                .map(|s| s.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(42), ids(42));
    }

    #[test]
    fn validate_diagnosis_checks_flag_and_unknown_ids() {
        let s = scenario("r1", "ring");
        assert_eq!(validate_diagnosis(&s, "b"), Ok(true));
        assert_eq!(validate_diagnosis(&s, "a"), Ok(false));
        assert_eq!(
            validate_diagnosis(&s, "z"),
            Err(FaultError::UnknownOption {
                scenario_id: "r1".into(),
                option_id: "z".into(),
            })
        );
    }

    #[test]
    fn trainer_session_records_and_scores() {
        let cat = small_catalog();
        let mut session = TrainerSession::new(cat.iter().take(2).collect());

        assert_eq!(session.submit(0, "b"), Ok(true));
        assert_eq!(session.submit(1, "a"), Ok(false));
        assert!(session.is_complete());

        let score = session.score();
        assert_eq!(
            score,
            SessionScore {
                total: 2,
                answered: 2,
                correct: 1,
            }
        );
        assert!((score.percent() - 50.0).abs() < 1e-9);
        assert_eq!(session.answer(0).map(|a| a.option_id.as_str()), Some("b"));
    }

    #[test]
    fn trainer_session_rejects_bad_submissions_without_recording() {
        let cat = small_catalog();
        let mut session = TrainerSession::new(cat.iter().take(1).collect());

        assert_eq!(
            session.submit(3, "a"),
            Err(FaultError::ScenarioOutOfRange { index: 3, len: 1 })
        );
        assert!(matches!(
            session.submit(0, "zz"),
            Err(FaultError::UnknownOption { .. })
        ));
        assert_eq!(session.score().answered, 0);

        assert_eq!(session.submit(0, "b"), Ok(true));
        assert_eq!(
            session.submit(0, "a"),
            Err(FaultError::AlreadyAnswered {
                scenario_id: "r1".into()
            })
        );
        assert_eq!(session.score().correct, 1);
    }

    #[test]
    fn empty_score_is_zero_percent() {
        let score = TrainerSession::new(Vec::new()).score();
        assert_eq!(score.percent(), 0.0);
        assert!(score.to_string().contains("Correct:   0/0 (0%)"));
    }
}

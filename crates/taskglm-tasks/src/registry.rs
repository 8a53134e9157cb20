//! Validated registry of task configurations.

use std::{collections::HashSet, fmt};

use taskglm_design::contrast::{Contrast, ContrastParseError};
use taskglm_events::{
    augment::DERIVED_COLUMNS,
    table::{REQUIRED_NUMERIC_COLUMNS, REQUIRED_TEXT_COLUMNS},
};
use tracing::debug;

use crate::{
    builtin,
    config::{BREAK_PERIOD, TaskConfig, TaskDefinition, break_period},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("unknown task '{task}'")]
    UnknownTask { task: String },
    #[display("invalid task configuration:\n{_0}")]
    Invalid(ValidationReport),
}

/// One problem found while validating the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigProblem {
    DuplicateTask {
        task: String,
    },
    DuplicateRegressor {
        task: String,
        regressor: String,
    },
    DuplicateContrast {
        task: String,
        contrast: String,
    },
    UnknownEventColumn {
        task: String,
        regressor: String,
        column: String,
    },
    BadFormula {
        task: String,
        contrast: String,
        error: ContrastParseError,
    },
    UnknownDesignColumn {
        task: String,
        contrast: String,
        column: String,
    },
}

impl fmt::Display for ConfigProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigProblem::DuplicateTask { task } => write!(f, "task '{task}' is declared twice"),
            ConfigProblem::DuplicateRegressor { task, regressor } => {
                write!(f, "{task}: regressor '{regressor}' is declared twice")
            }
            ConfigProblem::DuplicateContrast { task, contrast } => {
                write!(f, "{task}: contrast '{contrast}' is declared twice")
            }
            ConfigProblem::UnknownEventColumn {
                task,
                regressor,
                column,
            } => write!(
                f,
                "{task}: regressor '{regressor}' reads unknown event column '{column}'"
            ),
            ConfigProblem::BadFormula {
                task,
                contrast,
                error,
            } => write!(f, "{task}: contrast '{contrast}': {error}"),
            ConfigProblem::UnknownDesignColumn {
                task,
                contrast,
                column,
            } => write!(
                f,
                "{task}: contrast '{contrast}' references '{column}' which is not a regressor"
            ),
        }
    }
}

/// Every problem of a registry, reported together.
#[derive(Debug, Clone, PartialEq, derive_more::Error)]
pub struct ValidationReport {
    pub problems: Vec<ConfigProblem>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, problem) in self.problems.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {problem}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TaskRegistry {
    tasks: Vec<TaskConfig>,
}

impl TaskRegistry {
    /// Registry of every task of the study.
    pub fn builtin(model_break_period: bool) -> Result<Self, ConfigError> {
        Self::from_definitions(builtin::definitions(), model_break_period)
    }

    /// Validates definitions in a single pass.
    ///
    /// Contrasts may only reference `break_period` when it is modelled.
    pub fn from_definitions<I>(
        definitions: I,
        model_break_period: bool,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = TaskDefinition>,
    {
        let mut problems = Vec::new();
        let mut seen_tasks = HashSet::new();
        let mut tasks = Vec::new();
        for definition in definitions {
            if !seen_tasks.insert(definition.id.clone()) {
                problems.push(ConfigProblem::DuplicateTask {
                    task: definition.id.clone(),
                });
            }
            if let Some(task) = validate(definition, model_break_period, &mut problems) {
                tasks.push(task);
            }
        }
        if !problems.is_empty() {
            return Err(ConfigError::Invalid(ValidationReport { problems }));
        }
        debug!(n_tasks = tasks.len(), "validated task registry");
        Ok(Self { tasks })
    }

    pub fn get(&self, id: &str) -> Result<&TaskConfig, ConfigError> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or_else(|| ConfigError::UnknownTask {
                task: id.to_owned(),
            })
    }

    #[must_use]
    pub fn tasks(&self) -> &[TaskConfig] {
        &self.tasks
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|task| task.id.as_str())
    }
}

fn validate(
    definition: TaskDefinition,
    model_break_period: bool,
    problems: &mut Vec<ConfigProblem>,
) -> Option<TaskConfig> {
    let task = definition.id.as_str();
    let start = problems.len();

    let known_columns = REQUIRED_NUMERIC_COLUMNS
        .into_iter()
        .chain(REQUIRED_TEXT_COLUMNS)
        .chain(DERIVED_COLUMNS)
        .chain(definition.auxiliary_columns.iter().map(String::as_str))
        .collect::<HashSet<_>>();

    let mut regressor_names = HashSet::from([BREAK_PERIOD]);
    let mut design_columns = HashSet::new();
    if model_break_period {
        design_columns.extend(break_period().column_names());
    }
    for spec in &definition.regressors {
        if !regressor_names.insert(spec.name.as_str()) {
            problems.push(ConfigProblem::DuplicateRegressor {
                task: task.to_owned(),
                regressor: spec.name.clone(),
            });
        }
        design_columns.extend(spec.column_names());
        for column in spec.referenced_columns() {
            if !known_columns.contains(column) {
                problems.push(ConfigProblem::UnknownEventColumn {
                    task: task.to_owned(),
                    regressor: spec.name.clone(),
                    column: column.to_owned(),
                });
            }
        }
    }

    let mut contrast_names = HashSet::new();
    let mut contrasts = Vec::new();
    for (name, formula) in &definition.contrasts {
        if !contrast_names.insert(name.as_str()) {
            problems.push(ConfigProblem::DuplicateContrast {
                task: task.to_owned(),
                contrast: name.clone(),
            });
        }
        match Contrast::new(name.as_str(), formula) {
            Ok(contrast) => {
                for column in contrast.formula.identifiers() {
                    if !design_columns.contains(column) {
                        problems.push(ConfigProblem::UnknownDesignColumn {
                            task: task.to_owned(),
                            contrast: name.clone(),
                            column: column.to_owned(),
                        });
                    }
                }
                contrasts.push(contrast);
            }
            Err(error) => problems.push(ConfigProblem::BadFormula {
                task: task.to_owned(),
                contrast: name.clone(),
                error,
            }),
        }
    }

    if problems.len() > start {
        return None;
    }
    Some(TaskConfig {
        id: definition.id,
        family: definition.family,
        regressors: definition.regressors,
        contrasts,
        rt_centering: definition.rt_centering,
        confounds: definition.confounds,
        auxiliary_columns: definition.auxiliary_columns,
    })
}

#[cfg(test)]
mod tests {
    use taskglm_events::{filter::Filter, nuisance::TaskFamily};

    use super::*;
    use crate::config::{accurate, condition, trial_type};

    fn flanker() -> TaskDefinition {
        TaskDefinition::new("flanker", TaskFamily::TestTrial)
            .nuisance("", &Filter::All)
            .accurate_conditions(&["congruent", "incongruent"])
            .contrasts(&[("incongruent-congruent", "incongruent-congruent")])
    }

    #[test]
    fn test_builtin_registry_is_valid() {
        let registry = TaskRegistry::builtin(true).unwrap();
        assert_eq!(registry.tasks().len(), 19);
        for task in registry.tasks() {
            assert!(task.contrast("task-baseline").is_some(), "{}", task.id);
            assert!(task.contrast("response_time").is_some(), "{}", task.id);
            assert!(
                task.regressors.iter().any(|r| r.name == "response_time"),
                "{}",
                task.id
            );
        }
    }

    #[test]
    fn test_unknown_task_is_an_error() {
        let registry = TaskRegistry::from_definitions([flanker()], true).unwrap();
        assert!(registry.get("flanker").is_ok());
        assert!(matches!(
            registry.get("stroop"),
            Err(ConfigError::UnknownTask { ref task }) if task == "stroop"
        ));
    }

    #[test]
    fn test_problems_are_aggregated() {
        let broken = TaskDefinition::new("broken", TaskFamily::TestTrial)
            .regressor(condition("a", trial_type("a")))
            .regressor(condition("a", Filter::eq("no_such_column", 1)))
            .contrasts(&[
                ("bad", "a*a"),
                ("missing", "a-b"),
                ("missing", "a"),
            ]);
        let err =
            TaskRegistry::from_definitions([flanker(), broken, flanker()], true).unwrap_err();
        let ConfigError::Invalid(report) = err else {
            panic!("expected a validation report");
        };
        assert_eq!(report.problems.len(), 6);
        assert!(report.problems.contains(&ConfigProblem::DuplicateTask {
            task: "flanker".into()
        }));
        assert!(report.problems.contains(&ConfigProblem::UnknownDesignColumn {
            task: "broken".into(),
            contrast: "missing".into(),
            column: "b".into(),
        }));
        assert!(report.to_string().contains("no_such_column"));
    }

    #[test]
    fn test_auxiliary_columns_are_known() {
        let definition = TaskDefinition::new("nBack", TaskFamily::TestTrial)
            .regressor(condition("match_1back", accurate().and(Filter::eq("delay", 1))))
            .contrasts(&[("match_1back", "match_1back")]);
        assert!(TaskRegistry::from_definitions([definition.clone()], true).is_err());
        assert!(TaskRegistry::from_definitions([definition.auxiliary_column("delay")], true).is_ok());
    }

    #[test]
    fn test_break_period_is_appended_on_request() {
        let registry = TaskRegistry::from_definitions([flanker()], true).unwrap();
        let task = registry.get("flanker").unwrap();
        assert_eq!(task.design_regressors(false).len(), 5);
        let regressors = task.design_regressors(true);
        assert_eq!(regressors.last().unwrap().name, BREAK_PERIOD);
    }

    #[test]
    fn test_break_period_contrast_needs_the_regressor() {
        let definition = flanker().contrasts(&[
            ("break_period", "break_period"),
            ("breaks-congruent", "break_period-congruent"),
        ]);
        assert!(TaskRegistry::from_definitions([definition.clone()], true).is_ok());
        let err = TaskRegistry::from_definitions([definition], false).unwrap_err();
        let ConfigError::Invalid(report) = err else {
            panic!("expected a validation report");
        };
        assert_eq!(report.problems.len(), 2);
        assert!(report.problems.contains(&ConfigProblem::UnknownDesignColumn {
            task: "flanker".into(),
            contrast: "break_period".into(),
            column: "break_period".into(),
        }));
        assert!(TaskRegistry::builtin(false).is_ok());
    }

    #[test]
    fn test_task_config_serializes_formulas_as_text() {
        let registry = TaskRegistry::from_definitions([flanker()], true).unwrap();
        let json = serde_json::to_value(registry.get("flanker").unwrap()).unwrap();
        assert_eq!(json["id"], "flanker");
        assert_eq!(json["contrasts"][0]["formula"], "incongruent-congruent");
        assert_eq!(json["regressors"].as_array().unwrap().len(), 5);
    }
}

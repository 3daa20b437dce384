//! `alertcheck rule` command handler

use std::io::Write;

use serde::Serialize;

use alertcheck_core::config::HarnessConfig;
use alertcheck_harness::{AggregationRule, GraylogApi, ThresholdType};

use crate::cli::RuleArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `rule` command.
pub async fn execute(
    args: RuleArgs,
    config: &HarnessConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    if args.period == 0 {
        return Err(CliError::Command(
            "rule period must be at least one second".to_owned(),
        ));
    }

    let rule = build_rule(args);
    let api = GraylogApi::new(config)?;
    api.create_aggregation_rule(&rule).await?;

    writer.render(&RuleReport::from(&rule))?;
    Ok(())
}

fn build_rule(args: RuleArgs) -> AggregationRule {
    AggregationRule::builder(args.title, args.threshold_type, args.threshold)
        .period_secs(args.period)
        .group_by(args.group)
        .distinct(args.distinct)
        .build()
}

/// Created rule, as sent to the server.
#[derive(Serialize)]
pub struct RuleReport {
    pub title: String,
    pub threshold_type: ThresholdType,
    pub threshold: i64,
    pub period_secs: u64,
    pub grouping_fields: Vec<String>,
    pub distinction_fields: Vec<String>,
    pub condition: String,
}

impl From<&AggregationRule> for RuleReport {
    fn from(rule: &AggregationRule) -> Self {
        let (threshold_type, threshold) = rule.threshold();
        Self {
            title: rule.title().to_owned(),
            threshold_type,
            threshold,
            period_secs: rule.period().as_secs(),
            grouping_fields: rule.grouping_fields().to_vec(),
            distinction_fields: rule.distinction_fields().to_vec(),
            condition: rule.describe(),
        }
    }
}

impl Render for RuleReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Rule '{}' created", self.title)?;
        writeln!(w, "  Condition: {}", self.condition)?;
        writeln!(w, "  Period: {}s", self.period_secs)?;
        if !self.grouping_fields.is_empty() {
            writeln!(w, "  Group by: {}", self.grouping_fields.join(", "))?;
        }
        if !self.distinction_fields.is_empty() {
            writeln!(w, "  Distinct: {}", self.distinction_fields.join(", "))?;
        }
        Ok(())
    }
}

//! Risk Register

use crate::classifier::RiskLevel;
use crate::heatmap::{build_heatmap, HeatmapStats};
use crate::model::Risk;
use grc_common::{GrcError, GrcResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Risk register
///
/// In-memory collection keyed by risk id. Inherent and residual ratings stay
/// editable for the life of a risk.
pub struct RiskRegister {
    risks: Arc<RwLock<HashMap<String, Risk>>>,
}

impl RiskRegister {
    pub fn new() -> Self {
        Self {
            risks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add risk, replacing any risk with the same id
    pub fn add(&self, risk: Risk) -> String {
        let id = risk.id.clone();
        tracing::debug!(risk_id = %id, score = risk.score(), "Risk added to register");
        self.risks.write().insert(id.clone(), risk);
        id
    }

    /// Get risk
    pub fn get(&self, id: &str) -> Option<Risk> {
        self.risks.read().get(id).cloned()
    }

    /// Get all risks
    pub fn all(&self) -> Vec<Risk> {
        self.risks.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.risks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.risks.read().is_empty()
    }

    /// Get risks whose inherent level is `level`
    pub fn by_level(&self, level: RiskLevel) -> Vec<Risk> {
        self.risks
            .read()
            .values()
            .filter(|r| r.level() == level)
            .cloned()
            .collect()
    }

    /// Highest-scoring risks first, ties broken by title
    pub fn top_risks(&self, n: usize) -> Vec<Risk> {
        let mut risks = self.all();
        risks.sort_by(|a, b| b.score().cmp(&a.score()).then_with(|| a.title.cmp(&b.title)));
        risks.truncate(n);
        risks
    }

    /// Update risk in place
    pub fn update(&self, id: &str, f: impl FnOnce(&mut Risk)) -> GrcResult<()> {
        let mut risks = self.risks.write();
        let risk = risks
            .get_mut(id)
            .ok_or_else(|| GrcError::NotFound(format!("risk {}", id)))?;
        f(risk);
        Ok(())
    }

    /// Remove risk
    pub fn remove(&self, id: &str) -> GrcResult<Risk> {
        self.risks
            .write()
            .remove(id)
            .ok_or_else(|| GrcError::NotFound(format!("risk {}", id)))
    }

    /// Inherent risk summary on a `1..=axis_size` grid
    pub fn summary(&self, axis_size: u8) -> HeatmapStats {
        build_heatmap(&self.all(), axis_size, false).stats()
    }
}

impl Default for RiskRegister {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register() -> RiskRegister {
        let register = RiskRegister::new();
        register.add(Risk::with_id("r1", "Data breach", 5, 5));
        register.add(Risk::with_id("r2", "Printer jam", 1, 1));
        register.add(Risk::with_id("r3", "Key staff loss", 3, 3));
        register.add(Risk::with_id("r4", "Cloud outage", 3, 3));
        register
    }

    #[test]
    fn test_add_get_remove() {
        let register = register();
        assert_eq!(register.len(), 4);
        assert_eq!(register.get("r2").unwrap().title, "Printer jam");

        let removed = register.remove("r2").unwrap();
        assert_eq!(removed.id, "r2");
        assert!(register.get("r2").is_none());
        assert!(matches!(register.remove("r2"), Err(GrcError::NotFound(_))));
    }

    #[test]
    fn test_update_inherent_and_residual() {
        let register = register();
        register
            .update("r1", |r| {
                r.likelihood = 2;
                r.residual_likelihood = Some(1);
                r.residual_impact = Some(2);
            })
            .unwrap();

        let risk = register.get("r1").unwrap();
        assert_eq!(risk.score(), 10);
        assert_eq!(risk.residual_score(), Some(2));
        assert!(register.update("missing", |_| {}).is_err());
    }

    #[test]
    fn test_top_risks_ordering() {
        let register = register();
        let top: Vec<_> = register.top_risks(3).into_iter().map(|r| r.id).collect();
        assert_eq!(top, vec!["r1", "r4", "r3"]);
        assert_eq!(register.top_risks(10).len(), 4);
    }

    #[test]
    fn test_by_level_and_summary() {
        let register = register();
        assert_eq!(register.by_level(RiskLevel::Medium).len(), 2);
        assert_eq!(register.by_level(RiskLevel::High).len(), 0);

        let summary = register.summary(5);
        assert_eq!(summary.total_risks, 4);
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.medium_count, 2);
        assert_eq!(summary.low_count, 1);
    }

    #[test]
    fn test_summary_follows_axis_size() {
        let register = RiskRegister::new();
        register.add(Risk::with_id("wide", "Supplier insolvency", 8, 10));

        assert_eq!(register.summary(5).total_risks, 0);
        let summary = register.summary(10);
        assert_eq!(summary.total_risks, 1);
        assert_eq!(summary.critical_count, 1);
    }
}

//! Adapter registry: one adapter per [`TargetTool`], built once at startup.

use std::sync::Arc;

use relay_core::TargetTool;

use crate::adapter::OutputAdapter;
use crate::error::AdapterError;
use crate::preamble::Preambles;
use crate::tools::{
    AiderAdapter, ClaudeAdapter, ClineAdapter, CopilotAdapter, CursorAdapter, WindsurfAdapter,
};

/// Indexed by `TargetTool` discriminant, in [`TargetTool::all`] order.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn OutputAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Result<Self, AdapterError> {
        let preambles = Arc::new(Preambles::new()?);
        let adapters = TargetTool::all()
            .iter()
            .map(|tool| build(*tool, &preambles))
            .collect();
        Ok(AdapterRegistry { adapters })
    }

    pub fn get(&self, tool: TargetTool) -> &dyn OutputAdapter {
        self.adapters[tool as usize].as_ref()
    }

    /// Adapters for `tools`, de-duplicated, in request order.
    pub fn resolve(&self, tools: &[TargetTool]) -> Vec<&dyn OutputAdapter> {
        let mut seen = Vec::with_capacity(tools.len());
        let mut out = Vec::with_capacity(tools.len());
        for tool in tools {
            if seen.contains(tool) {
                continue;
            }
            seen.push(*tool);
            out.push(self.get(*tool));
        }
        out
    }
}

fn build(tool: TargetTool, preambles: &Arc<Preambles>) -> Box<dyn OutputAdapter> {
    match tool {
        TargetTool::Copilot => Box::new(CopilotAdapter),
        TargetTool::Claude => Box::new(ClaudeAdapter::new(preambles.clone())),
        TargetTool::Cursor => Box::new(CursorAdapter::new(preambles.clone())),
        TargetTool::Windsurf => Box::new(WindsurfAdapter::new(preambles.clone())),
        TargetTool::Cline => Box::new(ClineAdapter),
        TargetTool::Aider => Box::new(AiderAdapter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tool_maps_to_its_own_adapter() {
        let registry = AdapterRegistry::new().expect("registry");
        for tool in TargetTool::all() {
            assert_eq!(registry.get(*tool).tool(), *tool);
        }
    }

    #[test]
    fn resolve_dedups_and_keeps_order() {
        let registry = AdapterRegistry::new().unwrap();
        let tools: Vec<TargetTool> = registry
            .resolve(&[TargetTool::Cursor, TargetTool::Claude, TargetTool::Cursor])
            .iter()
            .map(|a| a.tool())
            .collect();
        assert_eq!(tools, vec![TargetTool::Cursor, TargetTool::Claude]);
    }
}

//! Deployment-config narrowing of candidate sets.

use tracing::warn;

use regform_config::DeploymentConfig;
use regform_model::Choice;

use crate::chain::{ChainSpec, DatasetView};

/// Narrows one level's candidates to what the deployment offers.
///
/// Deployments configure either the level itself ("offer these
/// faculties") or only a deeper level ("offer exactly these programs").
/// The second form still has to narrow every upstream level, so the
/// filter works in both directions: a direct intersection when this
/// node carries an allow-list, otherwise a back-projection through the
/// nearest descendant that does.
pub struct ConfigFilter<'a> {
    chain: &'a ChainSpec,
    config: &'a DeploymentConfig,
}

impl<'a> ConfigFilter<'a> {
    pub fn new(chain: &'a ChainSpec, config: &'a DeploymentConfig) -> Self {
        Self { chain, config }
    }

    /// Apply the first matching rule, preserving candidate order:
    ///
    /// 1. an explicit allow-list for this node intersects directly;
    /// 2. else the nearest descendant allow-list keeps a candidate only
    ///    if some allowed option is reachable through it;
    /// 3. else candidates pass unfiltered.
    pub fn filter_level(
        &self,
        index: usize,
        candidates: Vec<Choice>,
        ancestors: &[String],
        view: &DatasetView,
    ) -> Vec<Choice> {
        let node = self.chain.node(index);
        if let Some(allow) = self.config.allow_list(node.allow_key()) {
            return candidates
                .into_iter()
                .filter(|choice| allow.contains(&choice.value))
                .collect();
        }

        let mut descendant = None;
        for target in index + 1..self.chain.len() {
            if let Some(allow) = self.config.allow_list(self.chain.node(target).allow_key()) {
                descendant = Some((target, allow));
                break;
            }
        }
        let Some((target, allow)) = descendant else {
            return candidates;
        };

        // Back-projection walks the intermediate datasets; if any is
        // unavailable the restriction cannot be evaluated and the level
        // passes unfiltered rather than vanishing.
        for level in index + 1..=target {
            let dataset = self.chain.node(level).dataset();
            if !view.contains(dataset) {
                warn!(
                    chain = self.chain.name(),
                    field = node.field(),
                    dataset,
                    "dataset needed for allow-list back-projection is unavailable"
                );
                return candidates;
            }
        }

        candidates
            .into_iter()
            .filter(|choice| {
                let mut path = ancestors.to_vec();
                path.push(choice.value.clone());
                self.reaches_allowed(index + 1, target, &path, allow, view)
            })
            .collect()
    }

    /// Whether any option at `target` reachable through `ancestors` is
    /// in the allow-list.
    fn reaches_allowed(
        &self,
        level: usize,
        target: usize,
        ancestors: &[String],
        allow: &[String],
        view: &DatasetView,
    ) -> bool {
        let node = self.chain.node(level);
        let Some(dataset) = view.get(node.dataset()) else {
            return false;
        };
        let options = node.candidates(dataset, ancestors);
        if level == target {
            return options.iter().any(|option| allow.contains(&option.value));
        }
        options.iter().any(|option| {
            let mut path = ancestors.to_vec();
            path.push(option.value.clone());
            self.reaches_allowed(level + 1, target, &path, allow, view)
        })
    }
}

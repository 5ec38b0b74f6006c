//! Discounted returns and advantage weights.
use delve_core::Experience;
use std::collections::HashMap;

/// Discounted return of each experience within the stream of its agent.
///
/// Experiences of one agent are assumed to be in emission order. The return of a
/// terminal experience is its reward; later experiences of the same agent belong
/// to the next episode.
pub fn discounted_returns(batch: &[Experience], gamma: f32) -> Vec<f32> {
    let mut running: HashMap<usize, f32> = HashMap::new();
    let mut returns = vec![0.0; batch.len()];

    for (i, exp) in batch.iter().enumerate().rev() {
        let next = if exp.is_terminal {
            0.0
        } else {
            running.get(&exp.agent).copied().unwrap_or(0.0)
        };
        let g = exp.reward + gamma * next;
        running.insert(exp.agent, g);
        returns[i] = g;
    }

    returns
}

/// `exp(normalized return / temperature)`, clipped at `max_weight`.
///
/// All weights are `1` when the returns do not vary.
pub fn advantage_weights(returns: &[f32], temperature: f32, max_weight: f32) -> Vec<f32> {
    if returns.is_empty() {
        return vec![];
    }
    let n = returns.len() as f32;
    let mean = returns.iter().sum::<f32>() / n;
    let std = (returns.iter().map(|r| (r - mean).powi(2)).sum::<f32>() / n).sqrt();

    returns
        .iter()
        .map(|r| {
            let adv = if std > 1e-6 { (r - mean) / std } else { 0.0 };
            let w = (adv / temperature).exp();
            if w.is_finite() {
                w.min(max_weight)
            } else {
                max_weight
            }
        })
        .collect()
}

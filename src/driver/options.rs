use clap::Parser;

use crate::agent::Weights;
use crate::prelude::*;

#[derive(Clone, Debug, Parser)]
pub struct DriverOptions {
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Number of AI games to play back to back.
    #[arg(short, long, default_value_t = 1)]
    pub games: u32,

    /// Sanity bound on pieces per game.
    #[arg(short = 'p', long, default_value_t = MAX_PIECES)]
    pub max_pieces: u32,

    /// Fixes the shape stream so runs replay move for move.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Overrides the six evaluation weights, comma-separated:
    /// relief_max,relief_avg,relief_var,gaps,obs,discont
    #[arg(short, long)]
    pub weights: Option<String>,
}

impl DriverOptions {
    pub fn parse_weights(&self) -> Result<Weights> {
        let Some(spec) = &self.weights else {
            return Ok(Weights::default());
        };

        let values = spec
            .split(',')
            .map(|v| v.trim().parse::<f64>().map_err(Error::from))
            .collect::<Result<Vec<f64>>>()
            .with_context(|| format!("could not parse weights {spec:?}"))?;
        let &[relief_max, relief_avg, relief_var, gaps, obs, discont] = values.as_slice() else {
            return Err(anyhow!(
                "expected 6 comma-separated weights, received {}",
                values.len()
            ));
        };

        Ok(Weights {
            relief_max,
            relief_avg,
            relief_var,
            gaps,
            obs,
            discont,
        })
    }
}

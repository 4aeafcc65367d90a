//! Export: model dumps and plain-text reports.
//!
//! ```text
//! Network → export_model_json() → ModelConfig JSON → Network::from_json_str()
//! Posterior → write_posterior() → "  Low: 0.123" lines
//! ```

use std::io::Write;

use crate::model::{Classification, Posterior};
use crate::{Network, Result};

/// Write `network` as a pretty-printed JSON model document.
///
/// The output loads back with [`Network::from_json_str`] into an equivalent
/// network.
pub fn export_model_json(network: &Network, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &network.to_config())?;
    writeln!(writer)?;
    Ok(())
}

/// One line per state, canonical order, three decimals.
pub fn write_posterior(posterior: &Posterior, writer: &mut dyn Write) -> Result<()> {
    for (state, p) in posterior {
        writeln!(writer, "  {}: {:.3}", state, p)?;
    }
    Ok(())
}

/// `Risk: <state> (prob <p>)`.
pub fn write_classification(class: &Classification, writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "Risk: {} (prob {:.3})", class.state, class.probability)?;
    Ok(())
}

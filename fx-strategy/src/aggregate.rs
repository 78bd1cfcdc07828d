//! `aggregate`: one concurrent task per enabled provider, joined in
//! full before computing a mean — concurrency bounds latency at the
//! slowest single provider rather than the sum of all of them.

use std::collections::HashMap;
use std::sync::Arc;

use fx_errors::StrategyError;
use fx_providers::{Provider, RateList};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

const PROVIDER_LABEL: &str = "Aggregate [all]";

fn round8(x: f64) -> f64 {
    (x * 1e8).round() / 1e8
}

pub async fn rate(
    providers: &[Arc<dyn Provider>],
    base: &str,
    quote: &str,
) -> Result<(f64, String), StrategyError> {
    let cancel = CancellationToken::new();
    let mut set = JoinSet::new();
    for p in providers {
        let p = p.clone();
        let cancel = cancel.clone();
        let base = base.to_string();
        let quote = quote.to_string();
        set.spawn(async move {
            let result = p.rate(&base, &quote, &cancel).await;
            (p.name().to_string(), result)
        });
    }

    let mut successes = Vec::new();
    let mut errors = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((_, Ok(r))) => successes.push(r),
            Ok((name, Err(e))) => errors.push(format!("{name}: {e}")),
            Err(e) => errors.push(format!("provider task panicked: {e}")),
        }
    }

    if successes.is_empty() {
        return Err(StrategyError::AllFailed { errors });
    }

    let mean = successes.iter().sum::<f64>() / successes.len() as f64;
    Ok((round8(mean), PROVIDER_LABEL.to_string()))
}

pub async fn rates(
    providers: &[Arc<dyn Provider>],
    base: &str,
    quotes: &[String],
) -> Result<(RateList, String), StrategyError> {
    let cancel = CancellationToken::new();
    let mut set = JoinSet::new();
    for p in providers {
        let p = p.clone();
        let cancel = cancel.clone();
        let base = base.to_string();
        let quotes = quotes.to_vec();
        set.spawn(async move {
            let result = p.rates(&base, &quotes, &cancel).await;
            (p.name().to_string(), result)
        });
    }

    let mut per_quote: HashMap<String, Vec<f64>> = HashMap::new();
    let mut errors = Vec::new();
    let mut any_success = false;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((_, Ok(r))) => {
                any_success = true;
                for (quote, rate) in r {
                    per_quote.entry(quote).or_default().push(rate);
                }
            }
            Ok((name, Err(e))) => errors.push(format!("{name}: {e}")),
            Err(e) => errors.push(format!("provider task panicked: {e}")),
        }
    }

    if !any_success {
        return Err(StrategyError::AllFailed { errors });
    }

    let mut out = RateList::new();
    for q in quotes {
        if let Some(values) = per_quote.get(q) {
            if !values.is_empty() {
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                out.insert(q.clone(), round8(mean));
            }
        }
    }

    Ok((out, PROVIDER_LABEL.to_string()))
}

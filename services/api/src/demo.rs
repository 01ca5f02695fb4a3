use crate::infra::InMemorySellerLedger;
use carbon_match::config::load_scoring_file;
use carbon_match::error::AppError;
use carbon_match::marketplace::{
    MarketplaceError, MarketplaceService, NegotiationRequest, RankQuotesRequest, VendorImporter,
};
use carbon_match::scoring::{
    AnalyticsSnapshot, BuyerGoals, BuyerRequest, NegotiationResult, QuoteId, RankedQuote,
    RequestId, ScoringConfig, ScoringEngine, SellerId, SellerQuote, TransactionOutcome,
    UserTotals, VendorId, VendorOffer,
};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct NegotiateArgs {
    /// Vendor offers as CSV (by extension) or JSON
    #[arg(long)]
    pub(crate) vendors: PathBuf,
    /// Buyer goals as JSON. Defaults to cost 0.3, carbon 0.3, delivery 0.2, sustainability 0.2.
    #[arg(long)]
    pub(crate) goals: Option<PathBuf>,
    /// Scoring configuration JSON overriding the built-in weights
    #[arg(long)]
    pub(crate) scoring_config: Option<PathBuf>,
    /// Print the full result as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Scoring configuration JSON overriding the built-in weights
    #[arg(long)]
    pub(crate) scoring_config: Option<PathBuf>,
    /// Skip the vendor negotiation portion of the demo
    #[arg(long)]
    pub(crate) skip_negotiation: bool,
}

fn scoring_config(path: Option<&Path>) -> Result<ScoringConfig, AppError> {
    let config = match path {
        Some(path) => load_scoring_file(path)?,
        None => ScoringConfig::default(),
    };
    config
        .validate()
        .map_err(carbon_match::config::ConfigError::from)?;
    Ok(config)
}

pub(crate) fn run_negotiation(args: NegotiateArgs) -> Result<(), AppError> {
    let NegotiateArgs {
        vendors,
        goals,
        scoring_config: config_path,
        json,
    } = args;

    let config = scoring_config(config_path.as_deref())?;
    let vendors = VendorImporter::from_path(&vendors)?;
    let goals = match goals {
        Some(path) => VendorImporter::goals_from_path(path)?,
        None => BuyerGoals::default(),
    };

    let result = ScoringEngine::new(config)
        .negotiate(&vendors, &goals)
        .map_err(MarketplaceError::from)?;

    if json {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &result)
            .map_err(std::io::Error::from)?;
        println!();
    } else {
        render_negotiation(&result);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = scoring_config(args.scoring_config.as_deref())?;
    let service = MarketplaceService::new(Arc::new(InMemorySellerLedger::default()), config);

    println!("Carbon match demo");
    render_weights(&config);

    println!("\nSeller history");
    for (seller, outcomes) in sample_history() {
        let mut last = None;
        for outcome in outcomes {
            last = Some(service.record_transaction(&seller, outcome)?);
        }
        if let Some(entry) = last {
            println!(
                "- {}: {} transactions ({} successful) | avg rating {:.2} | {:.1} kg CO2e saved | reliability {:.1}",
                entry.seller_id,
                entry.record.total_transactions,
                entry.record.successful_transactions,
                entry.record.avg_rating,
                entry.record.carbon_savings,
                entry.record.reliability_score
            );
        }
    }

    let request = sample_request();
    let ranked = service.rank_quotes(RankQuotesRequest {
        request: request.clone(),
        quotes: sample_quotes(&request.id),
        seller_reliability: None,
    })?;
    println!(
        "\nQuotes for {} ({} t, carbon score {:.1}, ceiling {})",
        request.product,
        request.quantity,
        request.desired_carbon_score,
        request
            .max_price
            .map(|max| format!("{max:.2}"))
            .unwrap_or_else(|| "none".to_string())
    );
    for entry in &ranked.ranked {
        render_ranked_quote(entry);
    }

    if !args.skip_negotiation {
        let result = service.negotiate(NegotiationRequest {
            vendors: sample_vendors(),
            goals: None,
        })?;
        println!();
        render_negotiation(&result);
    }

    let snapshot = service.analytics(UserTotals {
        quantity_purchased: 65.0,
        green_credits: 420.0,
        reliability_score: Some(72.0),
        total_transactions: 4,
    })?;
    println!();
    render_analytics(&snapshot);

    Ok(())
}

fn render_weights(config: &ScoringConfig) {
    let weights = &config.matching.weights;
    println!(
        "- match weights: price {:.2} | carbon {:.2} | reliability {:.2} | confidence {:.2} (confidence {:.0})",
        weights.price_fairness,
        weights.carbon_alignment,
        weights.reliability,
        weights.ai_confidence,
        config.matching.ai_confidence
    );
    println!(
        "- reference ranges: price {:.0} | carbon {:.0} | delivery {:.0} | sustainability {:.0}",
        config.ranges.price_max,
        config.ranges.carbon_max,
        config.ranges.delivery_max,
        config.ranges.sustainability_max
    );
}

fn render_ranked_quote(entry: &RankedQuote) {
    let breakdown = &entry.result.breakdown;
    println!(
        "{}. {} from {}: {:.2} (price {:.0} | carbon {:.0} | reliability {:.1} via {} | confidence {:.0})",
        entry.rank,
        entry.quote_id.0,
        entry.seller_id,
        entry.result.match_score,
        breakdown.price_fairness,
        breakdown.carbon_alignment,
        breakdown.reliability,
        entry.result.reliability_source.label(),
        breakdown.ai_confidence
    );
}

fn render_negotiation(result: &NegotiationResult) {
    println!("Negotiation");
    println!("{}", result.reasoning);
    println!(
        "- field average: price {:.2} | carbon {:.2}",
        result.baseline.mean_price, result.baseline.mean_carbon
    );
    for entry in &result.comparison {
        println!(
            "{}. {} ({}): {:.2}",
            entry.rank, entry.vendor, entry.vendor_id, entry.score
        );
        println!("   {}", entry.negotiation_notes);
    }
}

fn render_analytics(snapshot: &AnalyticsSnapshot) {
    let breakdown = &snapshot.breakdown;
    println!("Buyer analytics: overall {}", snapshot.overall_score);
    println!(
        "- quantity {} | carbon {} | reliability {} | transactions {}",
        breakdown.quantity_score,
        breakdown.carbon_score,
        breakdown.reliability_score,
        breakdown.transaction_score
    );
}

fn sample_history() -> Vec<(SellerId, Vec<TransactionOutcome>)> {
    let outcome = |success, rating, carbon_saved| TransactionOutcome {
        success,
        rating,
        carbon_saved,
    };
    vec![
        (
            SellerId("borneo-peat".to_string()),
            vec![
                outcome(true, 4.8, 22.0),
                outcome(true, 4.5, 18.0),
                outcome(true, 4.9, 25.0),
                outcome(false, 3.0, 0.0),
            ],
        ),
        (
            SellerId("prairie-soil".to_string()),
            vec![outcome(true, 3.9, 6.0)],
        ),
    ]
}

fn sample_request() -> BuyerRequest {
    BuyerRequest {
        id: RequestId("demo-request".to_string()),
        product: "Verified peatland credits".to_string(),
        quantity: 120.0,
        desired_carbon_score: 7.5,
        max_price: Some(24.0),
    }
}

fn sample_quotes(request_id: &RequestId) -> Vec<SellerQuote> {
    let quote = |id: &str, seller: &str, price, carbon_score, snapshot| SellerQuote {
        id: QuoteId(id.to_string()),
        request_id: request_id.clone(),
        seller_id: SellerId(seller.to_string()),
        price,
        carbon_score,
        delivery_days: 5.0,
        reliability_score: snapshot,
    };
    vec![
        quote("q-borneo", "borneo-peat", 23.5, 7.9, None),
        quote("q-prairie", "prairie-soil", 18.0, 6.2, None),
        quote("q-andes", "andes-cloudforest", 26.0, 7.4, Some(64.0)),
        quote("q-delta", "delta-mangrove", 21.0, 9.8, None),
    ]
}

fn sample_vendors() -> Vec<VendorOffer> {
    let vendor = |id: &str, name: &str, price, carbon, delivery, sustainability, discount| {
        VendorOffer {
            id: VendorId(id.to_string()),
            name: name.to_string(),
            price,
            carbon,
            delivery,
            sustainability_score: sustainability,
            willing_to_discount: discount,
        }
    };
    vec![
        vendor("v-kelp", "Coastal Kelp Cooperative", 11.5, 14.0, 3.0, 8.5, false),
        vendor("v-biochar", "Biochar Works", 9.0, 35.0, 2.0, 6.0, true),
        vendor("v-forest", "Highland Reforestation", 16.0, 22.0, 6.0, 9.0, false),
    ]
}

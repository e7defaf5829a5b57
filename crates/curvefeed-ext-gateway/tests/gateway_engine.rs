//! The engine driven through the gateway client over a fake transport.

use std::sync::Arc;

use async_trait::async_trait;

use curvefeed_config::GatewaySettings;
use curvefeed_core::{CurveId, Tenor};
use curvefeed_engine::{CurveEngine, Selection};
use curvefeed_ext_gateway::{
    GatewayQuoteSource, HttpAuth, HttpRequest, HttpResponse, HttpTransport, TransportError,
};

/// Answers every request from a fixed security table, echoing only the
/// securities that were asked for.
struct FakeGateway {
    status: u16,
}

const TABLE: &[(&str, &str)] = &[
    ("EURUSD Curncy", "1.0850"),
    ("EURUSD1M Curncy", "9.8"),
    ("EURUSD3M Curncy", "\"29.5\""),
    ("EURUSD6M Curncy", "\"#N/A N/A\""),
    ("USDTWD Curncy", "31.9"),
    ("NTN1M Curncy", "-0.065"),
    ("NTN1Y Curncy", "-0.78"),
];

#[async_trait]
impl HttpTransport for FakeGateway {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if self.status != 200 {
            return Ok(HttpResponse {
                status: self.status,
                body: "upstream unavailable".into(),
            });
        }
        let raw = request.body.as_deref().unwrap_or("{}");
        let body: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| TransportError::Request(e.to_string()))?;
        let asked: Vec<String> = body["securities"]
            .as_array()
            .map(|a| a.iter().filter_map(|s| s.as_str().map(String::from)).collect())
            .unwrap_or_default();

        let entries: Vec<String> = TABLE
            .iter()
            .filter(|(t, _)| asked.iter().any(|a| a.as_str() == *t))
            .map(|(t, v)| {
                format!(
                    r#"{{"security":"{}","success":true,"fields":{{"PX_LAST":{}}}}}"#,
                    t, v
                )
            })
            .collect();
        Ok(HttpResponse::ok(format!(
            r#"{{"success":true,"data":{{"securities_data":[{}]}}}}"#,
            entries.join(",")
        )))
    }
}

fn engine(status: u16) -> CurveEngine {
    let source = GatewayQuoteSource::with_transport(
        GatewaySettings {
            max_batch_size: 3,
            ..GatewaySettings::default()
        },
        HttpAuth::None,
        Arc::new(FakeGateway { status }),
    )
    .unwrap();
    CurveEngine::builder()
        .with_quote_source(Arc::new(source))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_curves_through_gateway() {
    let ladder = [Tenor::Months(1), Tenor::Months(3), Tenor::Months(6), Tenor::Years(1)];
    let snapshot = engine(200)
        .run_cycle(1, &Selection::of(["EURUSD", "USDTWD"]).with_ladder(&ladder))
        .await
        .unwrap();

    let eur = snapshot.curve(&CurveId::new("EURUSD")).unwrap();
    assert_eq!(eur.labels(), vec!["Spot", "1M", "3M"]);
    assert_eq!(eur.data_quality.coverage_pct, 60);

    let twd = snapshot.curve(&CurveId::new("USDTWD")).unwrap();
    assert!(twd.uses_alternate_convention);
    assert_eq!(twd.labels(), vec!["Spot", "1M", "1Y"]);
    assert!(twd.points[1].derived_rate < 31.9);
}

#[tokio::test]
async fn test_gateway_status_fails_cycle() {
    let err = engine(503)
        .run_cycle(1, &Selection::of(["EURUSD"]))
        .await
        .unwrap_err();
    assert!(err.is_gateway());
    assert!(err.to_string().contains("503"));
}

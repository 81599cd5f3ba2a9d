use std::sync::atomic::{AtomicU32, Ordering};

use futures_util::{StreamExt, TryStreamExt};
use rust_decimal::Decimal;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use binance_api_client::error::{BinanceError, ErrorKind};
use binance_api_client::rate_limit::{RateLimitDescriptor, RateLimitInterval, RateLimitKind};
use binance_api_client::spot::rest::public::{Kline, KlinesRequest};
use binance_api_client::spot::rest::{SpotRestClient, stream_klines};
use binance_api_client::spot::rest::KlineSource;
use binance_api_client::types::Interval;

const MINUTE_MS: u64 = 60_000;

fn kline(open_time: u64) -> Kline {
    let price = Decimal::ONE;
    Kline {
        open_time,
        open: price,
        high: price,
        low: price,
        close: price,
        volume: Decimal::ZERO,
        close_time: open_time + MINUTE_MS - 1,
        quote_volume: Decimal::ZERO,
        trades: 1,
        taker_buy_base_volume: Decimal::ZERO,
        taker_buy_quote_volume: Decimal::ZERO,
    }
}

/// Synthetic kline source over a fixed backing data set.
///
/// Serves pages the way the exchange does: records within the inclusive
/// start/end range, truncated to the request limit, with calls counted so
/// tests can assert on pagination laziness.
struct FixedSource {
    klines: Vec<Kline>,
    calls: AtomicU32,
}

impl FixedSource {
    fn minutes(count: u64) -> Self {
        Self {
            klines: (0..count).map(|i| kline(i * MINUTE_MS)).collect(),
            calls: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KlineSource for FixedSource {
    async fn klines(&self, request: &KlinesRequest) -> Result<Vec<Kline>, BinanceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .klines
            .iter()
            .filter(|k| k.open_time >= request.start_time && k.open_time <= request.end_time)
            .take(request.limit as usize)
            .cloned()
            .collect())
    }
}

/// A source that fails with a connectivity-shaped error after the first page.
struct FailingSource {
    inner: FixedSource,
}

impl KlineSource for FailingSource {
    async fn klines(&self, request: &KlinesRequest) -> Result<Vec<Kline>, BinanceError> {
        if self.inner.call_count() > 0 {
            self.inner.calls.fetch_add(1, Ordering::SeqCst);
            return Err(BinanceError::InvalidResponse("simulated failure".to_string()));
        }
        self.inner.klines(request).await
    }
}

#[tokio::test]
async fn test_stream_stitches_truncated_pages_over_full_range() {
    // Ten 1-minute records over a 10-minute window, served two per page.
    let source = FixedSource::minutes(10);
    let request =
        KlinesRequest::new("BTCUSDT", Interval::OneMinute, 0, 10 * MINUTE_MS).with_limit(2);

    let records: Vec<Kline> = stream_klines(&source, request).try_collect().await.unwrap();

    let open_times: Vec<u64> = records.iter().map(|k| k.open_time).collect();
    let expected: Vec<u64> = (0..10).map(|i| i * MINUTE_MS).collect();
    assert_eq!(open_times, expected);

    // Chronologically ordered, non-overlapping, no duplicate open times.
    assert!(open_times.windows(2).all(|pair| pair[0] < pair[1]));

    // Every truncated page re-fetches its boundary record; the final page
    // carries two records and completes the range.
    assert_eq!(source.call_count(), 9);
}

#[tokio::test]
async fn test_stream_is_idempotent_over_fixed_data() {
    let source = FixedSource::minutes(10);
    let request =
        KlinesRequest::new("BTCUSDT", Interval::OneMinute, 0, 10 * MINUTE_MS).with_limit(3);

    let first: Vec<Kline> = stream_klines(&source, request.clone())
        .try_collect()
        .await
        .unwrap();
    let second: Vec<Kline> = stream_klines(&source, request).try_collect().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_singleton_page_terminates_without_recursion() {
    // One record far from the requested end time: a 1-day range at 1-day
    // granularity where the endpoint has a single record.
    let source = FixedSource {
        klines: vec![kline(0)],
        calls: AtomicU32::new(0),
    };
    let request = KlinesRequest::new("BTCUSDT", Interval::OneDay, 0, 86_400_000).with_limit(500);

    let records: Vec<Kline> = stream_klines(&source, request).try_collect().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn test_empty_page_yields_nothing() {
    let source = FixedSource {
        klines: vec![],
        calls: AtomicU32::new(0),
    };
    let request = KlinesRequest::new("BTCUSDT", Interval::OneMinute, 0, 10 * MINUTE_MS);

    let records: Vec<Kline> = stream_klines(&source, request).try_collect().await.unwrap();

    assert!(records.is_empty());
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn test_stream_is_tail_lazy() {
    let source = FixedSource::minutes(10);
    let request =
        KlinesRequest::new("BTCUSDT", Interval::OneMinute, 0, 10 * MINUTE_MS).with_limit(2);

    {
        let stream = stream_klines(&source, request);
        let mut stream = std::pin::pin!(stream);

        // Consuming one record needs only the first page.
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.open_time, 0);
        assert_eq!(source.call_count(), 1);
    }

    // Dropping the stream early issues no further requests.
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn test_transport_error_ends_stream_after_partial_yield() {
    let source = FailingSource {
        inner: FixedSource::minutes(10),
    };
    let request =
        KlinesRequest::new("BTCUSDT", Interval::OneMinute, 0, 10 * MINUTE_MS).with_limit(2);

    let results: Vec<Result<Kline, BinanceError>> =
        stream_klines(&source, request).collect().await;

    // The first page yields its non-boundary record, then the failure
    // surfaces and the stream ends; yielded records are not retracted.
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap().open_time, 0);
    assert_eq!(results[1].as_ref().unwrap_err().kind(), ErrorKind::Protocol);
}

#[tokio::test]
async fn test_stream_klines_end_to_end_with_rate_gates() {
    let server = MockServer::start().await;

    let page = |times: &[u64]| -> serde_json::Value {
        times
            .iter()
            .map(|t| {
                serde_json::json!([
                    t,
                    "1.0",
                    "1.0",
                    "1.0",
                    "1.0",
                    "0.0",
                    t + MINUTE_MS - 1,
                    "0.0",
                    1,
                    "0.0",
                    "0.0",
                    "0"
                ])
            })
            .collect()
    };

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("startTime", "0"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "1m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[0, MINUTE_MS])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("startTime", MINUTE_MS.to_string()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(&[MINUTE_MS, 2 * MINUTE_MS])),
        )
        .mount(&server)
        .await;

    let client = SpotRestClient::builder()
        .base_url(server.uri())
        .rate_limits(vec![RateLimitDescriptor::new(
            RateLimitKind::RequestWeight,
            RateLimitInterval::Minute,
            1,
            6000,
        )])
        .build();

    let request =
        KlinesRequest::new("BTCUSDT", Interval::OneMinute, 0, 3 * MINUTE_MS).with_limit(2);
    let records: Vec<Kline> = client.stream_klines(request).try_collect().await.unwrap();

    let open_times: Vec<u64> = records.iter().map(|k| k.open_time).collect();
    assert_eq!(open_times, vec![0, MINUTE_MS, 2 * MINUTE_MS]);
}

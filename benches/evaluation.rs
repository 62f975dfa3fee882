use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serde_json::json;

use flag_targeting::{features::FeaturesConfig, Condition, Configuration, SavedGroups, Value};

fn criterion_benchmark(c: &mut Criterion) {
    let document = json!({
        "country": {"$in": ["US", "CA", "MX"]},
        "app.version": {"$vgte": "2.1.0"},
        "$or": [{"plan": "pro"}, {"id": {"$inGroup": "beta"}}],
        "orders": {"$elemMatch": {"total": {"$gt": 100}}}
    });
    let attributes = Value::from(json!({
        "id": "user-42",
        "country": "CA",
        "plan": "free",
        "app": {"version": "2.10.1"},
        "orders": [{"total": 20}, {"total": 120}]
    }));
    let groups: SavedGroups = [(
        "beta".to_owned(),
        (0..1000).map(|i| Value::from(format!("user-{i}"))).collect(),
    )]
    .into_iter()
    .collect();

    {
        let mut group = c.benchmark_group("condition");
        group.throughput(Throughput::Elements(1));
        group.bench_function("build", |b| {
            b.iter(|| Condition::build(black_box(&document)))
        });
        let condition = Condition::build(&document).unwrap();
        group.bench_function("evaluate", |b| {
            b.iter(|| condition.evaluate(black_box(&attributes), black_box(&groups)))
        });
        group.finish();
    }

    {
        let payload = json!({
            "features": {
                "new-checkout": {
                    "defaultValue": false,
                    "rules": [
                        {"id": "internal", "condition": {"email": {"$regex": "@company\\.com$"}}, "force": true},
                        {"id": "targeted", "condition": document, "force": true}
                    ]
                }
            },
            "savedGroups": groups
        });
        let configuration = Configuration::from_server_response(
            FeaturesConfig::from_json(payload.to_string().into_bytes()).unwrap(),
        );

        let mut group = c.benchmark_group("new-checkout");
        group.throughput(Throughput::Elements(1));
        group.bench_function("get_feature_value", |b| {
            b.iter(|| {
                configuration.get_feature_value(black_box("new-checkout"), black_box(&attributes))
            })
        });
        group.finish();
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

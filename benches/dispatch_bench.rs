//! Benchmark for pattern dispatch, curried application and memoization.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use funkit::prelude::*;
use std::hint::black_box;

fn sum_function(arity: usize) -> Function {
    let parameters: Vec<String> = (0..arity).map(|index| format!("p{index}")).collect();
    Function::with_parameters("sum", parameters, |arguments| {
        let mut total = 0;
        for value in arguments.values() {
            total += i64::from_value(value)?;
        }
        Ok(Value::from(total))
    })
}

// =============================================================================
// 1. Dispatch
// =============================================================================

fn benchmark_dispatch_depth(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("dispatch_depth");

    for rule_count in [1_i64, 8, 64] {
        let matcher = Matcher::new();
        for literal in 0..rule_count {
            matcher
                .register(pattern![literal, TypeTag::Str, ..], literal)
                .expect("trailing catch-all is valid");
        }
        let arguments = [Value::from(rule_count - 1), Value::from("x"), Value::Unit];

        group.bench_with_input(
            BenchmarkId::from_parameter(rule_count),
            &arguments,
            |bencher, arguments| {
                bencher.iter(|| black_box(matcher.call(black_box(arguments))));
            },
        );
    }

    group.finish();
}

fn benchmark_recursive_dispatch(criterion: &mut Criterion) {
    let fibonacci = Matcher::recursive(|this| {
        let this = this.clone();
        MatcherBuilder::new()
            .rule(pattern![0], 0)
            .rule(pattern![1], 1)
            .rule(
                pattern![TypeTag::Int],
                Function::new("fibonacci", move |arguments| {
                    let n = i64::from_value(arguments.bind(0, "n")?)?;
                    let a = i64::from_value(&this.call(&[Value::from(n - 1)])?)?;
                    let b = i64::from_value(&this.call(&[Value::from(n - 2)])?)?;
                    Ok(Value::from(a + b))
                }),
            )
    })
    .expect("rules are valid");

    criterion.bench_function("recursive_fibonacci_15", |bencher| {
        bencher.iter(|| black_box(fibonacci.call(&[Value::from(black_box(15))])));
    });
}

// =============================================================================
// 2. Currying
// =============================================================================

fn benchmark_curry_partitions(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("curry_partitions");
    let values: Vec<Value> = (0..6).map(Value::from).collect();

    group.bench_function("direct", |bencher| {
        let stage = Curried::new(sum_function(6));
        bencher.iter(|| black_box(stage.call(black_box(&values))));
    });

    group.bench_function("one_at_a_time", |bencher| {
        let root = Curried::new(sum_function(6));
        bencher.iter(|| {
            let mut current = root.clone();
            let mut outcome = None;
            for value in &values {
                match current.call(std::slice::from_ref(value)) {
                    Ok(Applied::Partial(next)) => current = next,
                    other => outcome = Some(other),
                }
            }
            black_box(outcome)
        });
    });

    group.finish();
}

// =============================================================================
// 3. Memoization
// =============================================================================

fn benchmark_memo_hit(criterion: &mut Criterion) {
    let memoized = Memoized::new(sum_function(3));
    let bypass = Arguments::from([Value::from(1), Value::from(2)]).with_keyword("p2", 3);
    let _ = memoized.call(Arguments::from([Value::from(1), Value::from(2), Value::from(3)]));

    criterion.bench_function("memo_keyword_bypass", |bencher| {
        bencher.iter(|| black_box(memoized.call(black_box(bypass.clone()))));
    });

    let hit = Arguments::from([Value::from(1), Value::from(2), Value::from(3)]);
    criterion.bench_function("memo_hit", |bencher| {
        bencher.iter(|| black_box(memoized.call(black_box(hit.clone()))));
    });
}

criterion_group!(
    benches,
    benchmark_dispatch_depth,
    benchmark_recursive_dispatch,
    benchmark_curry_partitions,
    benchmark_memo_hit
);
criterion_main!(benches);

//! Benchmarks for the data flow solver.
//!
//! Measures solving time for each bundled analysis on generated functions:
//! - A chain of diamonds with local reassignments (expression analyses)
//! - A chain of counting loops (liveness with phi operands)
//! - A whole module through the pipeline, sequential and parallel

extern crate flowscope;

use criterion::{criterion_group, criterion_main, Criterion};
use flowscope::prelude::*;
use std::hint::black_box;

/// Builds `count` diamonds in sequence. Every arm recomputes sums over two locals and one
/// arm overwrites a local, so expressions are killed on some paths only.
fn diamond_chain(count: usize) -> Function {
    let mut b = FunctionBuilder::new("diamonds", 1);
    let x = b.add_local();
    let y = b.add_local();
    let mut head = b.create_block();
    b.assign(head, x, Value::Param(0));
    b.assign(head, y, Value::Const(1));

    for i in 0..count {
        let left = b.create_block();
        let right = b.create_block();
        let join = b.create_block();
        let cond = b.compare(head, CmpPredicate::Slt, x, y);
        b.branch(head, cond, left, right);

        b.binary(left, BinaryOp::Add, x, y);
        b.binary_into(left, x, BinaryOp::Mul, x, Value::Const(2));
        b.jump(left, join);

        b.binary(right, BinaryOp::Add, x, y);
        b.binary(right, BinaryOp::Sub, y, Value::Const(i64::try_from(i).unwrap_or(0)));
        b.jump(right, join);

        b.binary(join, BinaryOp::Add, x, y);
        head = join;
    }
    b.ret(head, Some(x));
    b.finish().unwrap()
}

/// Builds `count` counting loops in sequence, in SSA form. Each loop carries its counter and
/// an accumulator through phi nodes.
fn loop_chain(count: usize) -> Function {
    let mut b = FunctionBuilder::new("loops", 2);
    let mut pre = b.create_block();
    let mut acc: Value = Value::Param(1);

    for _ in 0..count {
        let header = b.create_block();
        let body = b.create_block();
        let exit = b.create_block();
        let enter = b.jump(pre, header);

        // ids follow creation order: phi, phi, cmp, br, then the body's two updates
        let base = enter.index();
        let next_counter = InstId::new(base + 5);
        let next_acc = InstId::new(base + 6);
        let counter = b.phi(
            header,
            vec![(Value::Param(0), pre), (next_counter.into(), body)],
        );
        let carried = b.phi(header, vec![(acc, pre), (next_acc.into(), body)]);
        let cond = b.compare(header, CmpPredicate::Sgt, counter, Value::Const(0));
        b.branch(header, cond, body, exit);
        b.binary(body, BinaryOp::Sub, counter, Value::Const(1));
        b.binary(body, BinaryOp::Mul, carried, Value::Param(1));
        b.jump(body, header);

        acc = carried.into();
        pre = exit;
    }
    b.ret(pre, Some(acc));
    b.finish().unwrap()
}

fn bench_available_diamonds(c: &mut Criterion) {
    let function = diamond_chain(64);

    c.bench_function("available_diamonds_64", |b| {
        b.iter(|| {
            let results = DataFlowSolver::new(AvailableExpressions)
                .solve(black_box(&function))
                .unwrap();
            black_box(results)
        });
    });
}

fn bench_anticipated_diamonds(c: &mut Criterion) {
    let function = diamond_chain(64);

    c.bench_function("anticipated_diamonds_64", |b| {
        b.iter(|| {
            let results = DataFlowSolver::new(AnticipatedExpressions)
                .solve(black_box(&function))
                .unwrap();
            black_box(results)
        });
    });
}

/// Includes the anticipated run the composition depends on.
fn bench_will_be_available_diamonds(c: &mut Criterion) {
    let function = diamond_chain(64);

    c.bench_function("will_be_available_diamonds_64", |b| {
        b.iter(|| {
            let anticipated = DataFlowSolver::new(AnticipatedExpressions)
                .solve(black_box(&function))
                .unwrap();
            let results = WillBeAvailableExpressions::new(&anticipated)
                .run(&function)
                .unwrap();
            black_box(results)
        });
    });
}

fn bench_liveness_loops(c: &mut Criterion) {
    let function = loop_chain(16);

    c.bench_function("liveness_loop_chain_16", |b| {
        b.iter(|| {
            let results = DataFlowSolver::new(LiveVariables)
                .solve(black_box(&function))
                .unwrap();
            black_box(results)
        });
    });
}

fn bench_pipeline_module(c: &mut Criterion) {
    let module: Module = (0..32).map(|_| diamond_chain(16)).collect();

    c.bench_function("pipeline_module_sequential", |b| {
        let pipeline = AnalysisPipeline::new(PipelineConfig::new().with_parallel(false));
        b.iter(|| black_box(pipeline.run_module(black_box(&module)).unwrap()));
    });

    c.bench_function("pipeline_module_parallel", |b| {
        let pipeline = AnalysisPipeline::new(PipelineConfig::new().with_parallel(true));
        b.iter(|| black_box(pipeline.run_module(black_box(&module)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_available_diamonds,
    bench_anticipated_diamonds,
    bench_will_be_available_diamonds,
    bench_liveness_loops,
    bench_pipeline_module,
);
criterion_main!(benches);

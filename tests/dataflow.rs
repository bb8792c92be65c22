//! Data flow integration tests.
//!
//! These tests exercise the analyses through the public API only:
//! 1. Build a function with `FunctionBuilder`
//! 2. Run an analysis with `DataFlowSolver`
//! 3. Query the domain and the per-instruction facts

use flowscope::{
    dataflow::{
        AnticipatedExpressions, AvailableExpressions, DataFlowAnalysis, DataFlowSolver,
        Direction, Domain, DomainValue, Expression, Intersect, LiveVariables, Union,
        WillBeAvailableExpressions,
    },
    ir::{BinaryOp, CmpPredicate, Function, FunctionBuilder, InstId, Instruction, Value},
    Error, Result,
};

/// A counting loop with a loop-invariant product and a phi-carried induction variable.
///
/// ```text
/// bb0: jump bb1
/// bb1: i = phi [p0, bb0], [next, bb2]; c = cmp sgt i, 0; br c, bb2, bb3
/// bb2: k = p1 * p2; next = i - k; jump bb1
/// bb3: r = p1 * p2; ret r
/// ```
struct Loop {
    function: Function,
    phi: InstId,
    cmp: InstId,
    product: InstId,
    next: InstId,
    exit_product: InstId,
    ret: InstId,
}

fn counting_loop() -> Result<Loop> {
    let mut b = FunctionBuilder::new("count", 3);
    let entry = b.create_block();
    let head = b.create_block();
    let body = b.create_block();
    let exit = b.create_block();

    b.jump(entry, head);
    // ids are assigned in creation order: jump=0, phi=1, cmp=2, br=3, product=4, next=5
    let next_id = InstId::new(5);
    let phi = b.phi(head, vec![(Value::Param(0), entry), (next_id.into(), body)]);
    let cmp = b.compare(head, CmpPredicate::Sgt, phi, Value::Const(0));
    b.branch(head, cmp, body, exit);
    let product = b.binary(body, BinaryOp::Mul, Value::Param(1), Value::Param(2));
    let next = b.binary(body, BinaryOp::Sub, phi, product);
    assert_eq!(next, next_id);
    b.jump(body, head);
    let exit_product = b.binary(exit, BinaryOp::Mul, Value::Param(1), Value::Param(2));
    let ret = b.ret(exit, Some(exit_product.into()));

    Ok(Loop {
        function: b.finish()?,
        phi,
        cmp,
        product,
        next,
        exit_product,
        ret,
    })
}

#[test]
fn test_available_expressions_scenario() -> Result<()> {
    // t1 = a + b; t2 = a + b; a = 0; t3 = a + b
    let mut b = FunctionBuilder::new("scenario", 0);
    let a = b.add_local();
    let bv = b.add_local();
    let entry = b.create_block();
    let t1 = b.binary(entry, BinaryOp::Add, a, bv);
    let t2 = b.binary(entry, BinaryOp::Add, a, bv);
    let reset = b.assign(entry, a, Value::Const(0));
    let t3 = b.binary(entry, BinaryOp::Add, a, bv);
    b.ret(entry, Some(t3.into()));
    let function = b.finish()?;

    let results = DataFlowSolver::new(AvailableExpressions).solve(&function)?;
    assert_eq!(results.domain().len(), 1);

    let bit = |inst| results.fact(inst).map(|fact| fact.contains(0));
    assert_eq!(bit(t1), Some(true));
    assert_eq!(bit(t2), Some(true));
    assert_eq!(bit(reset), Some(false));
    assert_eq!(bit(t3), Some(true));
    Ok(())
}

#[test]
fn test_liveness_scenario() -> Result<()> {
    // x = 1; y = x + 1; return y
    let mut b = FunctionBuilder::new("scenario", 0);
    let x = b.add_local();
    let y = b.add_local();
    let entry = b.create_block();
    let def_x = b.assign(entry, x, Value::Const(1));
    let def_y = b.binary_into(entry, y, BinaryOp::Add, x, Value::Const(1));
    let ret = b.ret(entry, Some(y));
    let function = b.finish()?;

    let results = DataFlowSolver::new(LiveVariables).solve(&function)?;
    assert_eq!(results.domain().elements(), &[x, y]);
    assert_eq!(results.fact(ret).map(DomainValue::to_bools), Some(vec![false, true]));
    assert_eq!(results.fact(def_y).map(DomainValue::to_bools), Some(vec![true, false]));
    assert_eq!(results.fact(def_x).map(DomainValue::to_bools), Some(vec![false, false]));
    Ok(())
}

#[test]
fn test_empty_domain_converges_in_one_pass() -> Result<()> {
    let mut b = FunctionBuilder::new("empty", 0);
    let entry = b.create_block();
    let exit = b.create_block();
    let jump = b.jump(entry, exit);
    let ret = b.ret(exit, None);
    let function = b.finish()?;

    let available = DataFlowSolver::new(AvailableExpressions).solve(&function)?;
    let liveness = DataFlowSolver::new(LiveVariables).solve(&function)?;
    assert!(available.domain().is_empty());
    assert_eq!(available.passes(), 1);
    assert!(liveness.domain().is_empty());
    assert_eq!(liveness.passes(), 1);

    for inst in [jump, ret] {
        assert_eq!(available.fact(inst).map(DomainValue::len), Some(0));
        assert_eq!(liveness.fact(inst).map(DomainValue::len), Some(0));
    }
    Ok(())
}

#[test]
fn test_domain_discovery_round_trip() -> Result<()> {
    let Loop { function, .. } = counting_loop()?;

    let first = DataFlowSolver::new(LiveVariables).solve(&function)?;
    let second = DataFlowSolver::new(LiveVariables).solve(&function)?;
    assert!(first.domain().is_congruent(second.domain()));
    assert_eq!(first.facts(), second.facts());

    let available = DataFlowSolver::new(AvailableExpressions).solve(&function)?;
    let anticipated = DataFlowSolver::new(AnticipatedExpressions).solve(&function)?;
    assert!(available.domain().is_congruent(anticipated.domain()));
    Ok(())
}

#[test]
fn test_loop_invariant_product() -> Result<()> {
    let l = counting_loop()?;
    let product = Expression::new(BinaryOp::Mul, Value::Param(1), Value::Param(2));

    let available = DataFlowSolver::new(AvailableExpressions).solve(&l.function)?;
    // computed in the body, but the loop can be left before the first iteration
    assert!(available.holds(l.product, &product));
    assert!(!available.holds(l.cmp, &product));
    assert!(available.holds(l.exit_product, &product));

    let anticipated = DataFlowSolver::new(AnticipatedExpressions).solve(&l.function)?;
    // both loop exits compute it, so it is anticipated at the loop header
    assert!(anticipated.holds(l.cmp, &product));
    assert!(anticipated.holds(l.phi, &product));

    // the subtraction uses the phi, which redefines it on every iteration
    let sub = Expression::new(BinaryOp::Sub, Value::Inst(l.phi), Value::Inst(l.product));
    assert!(anticipated.holds(l.next, &sub));
    assert!(!anticipated.holds(l.phi, &sub));
    Ok(())
}

#[test]
fn test_liveness_across_loop() -> Result<()> {
    let l = counting_loop()?;
    let live = DataFlowSolver::new(LiveVariables).solve(&l.function)?;

    // p1 and p2 are read in the body and at the exit
    for inst in [l.phi, l.cmp, l.product] {
        assert!(live.holds(inst, &Value::Param(1)), "p1 live at {inst}");
        assert!(live.holds(inst, &Value::Param(2)), "p2 live at {inst}");
    }
    // the phi result is read by the compare and the subtraction
    assert!(live.holds(l.cmp, &Value::Inst(l.phi)));
    assert!(live.holds(l.next, &Value::Inst(l.phi)));
    assert!(!live.holds(l.phi, &Value::Inst(l.phi)));
    // nothing but the product is live at the return
    assert_eq!(live.elements_at(l.ret), vec![&Value::Inst(l.exit_product)]);
    Ok(())
}

#[test]
fn test_critical_edge_refusal() -> Result<()> {
    let mut b = FunctionBuilder::new("critical", 2);
    let entry = b.create_block();
    let side = b.create_block();
    let join = b.create_block();
    b.branch(entry, Value::Param(0), side, join);
    b.binary(side, BinaryOp::Add, Value::Param(0), Value::Param(1));
    b.jump(side, join);
    b.ret(join, None);
    let function = b.finish()?;

    match DataFlowSolver::new(AnticipatedExpressions).solve(&function) {
        Err(Error::CriticalEdge { from, to }) => {
            assert_eq!((from, to), (entry, join));
        }
        other => panic!("expected a critical edge error, got {other:?}"),
    }

    // forward and union analyses do not care
    assert!(DataFlowSolver::new(AvailableExpressions)
        .solve(&function)
        .is_ok());
    assert!(DataFlowSolver::new(LiveVariables).solve(&function).is_ok());
    Ok(())
}

#[test]
fn test_will_be_available_composition() -> Result<()> {
    let l = counting_loop()?;
    let anticipated = DataFlowSolver::new(AnticipatedExpressions).solve(&l.function)?;
    let wbavail = WillBeAvailableExpressions::new(&anticipated).run(&l.function)?;

    assert!(wbavail.domain().is_congruent(anticipated.domain()));
    for (inst, fact) in anticipated.facts().iter() {
        let composed = &wbavail.facts()[inst];
        assert!(fact.is_subset(composed), "anticipated facts are kept at {inst}");
    }
    Ok(())
}

#[test]
fn test_fact_before_matches_direction() -> Result<()> {
    let l = counting_loop()?;

    let available = DataFlowSolver::new(AvailableExpressions).solve(&l.function)?;
    assert_eq!(available.direction(), Direction::Forward);
    assert_eq!(
        available.fact_before(&l.function, l.next),
        available.fact(l.product)
    );

    let live = DataFlowSolver::new(LiveVariables).solve(&l.function)?;
    assert_eq!(live.direction(), Direction::Backward);
    assert_eq!(live.fact_before(&l.function, l.product), live.fact(l.next));
    // the return is the last instruction of an exit block
    assert!(live
        .fact_before(&l.function, l.ret)
        .is_some_and(DomainValue::none));
    Ok(())
}

/// A user-defined analysis plugged into the engine: which parameters may have been
/// passed to a call so far.
struct EscapedParams;

impl DataFlowAnalysis for EscapedParams {
    type Element = Value;
    type Meet = Union;
    const DIRECTION: Direction = Direction::Forward;
    const NAME: &'static str = "escaped-params";

    fn discover(&self, _: &Function, inst: &Instruction, domain: &mut Domain<Value>) {
        for operand in inst.operands() {
            if matches!(operand, Value::Param(_)) {
                domain.insert(operand);
            }
        }
    }

    fn transfer(
        &self,
        _: &Function,
        inst: &Instruction,
        input: &DomainValue,
        domain: &Domain<Value>,
    ) -> DomainValue {
        let mut output = input.clone();
        if let flowscope::ir::InstKind::Call { args, .. } = inst.kind() {
            for arg in args {
                if let Some(index) = domain.index_of(arg) {
                    output.insert(index);
                }
            }
        }
        output
    }
}

/// The same question asked as a must analysis.
struct AlwaysEscapedParams;

impl DataFlowAnalysis for AlwaysEscapedParams {
    type Element = Value;
    type Meet = Intersect;
    const DIRECTION: Direction = Direction::Forward;
    const NAME: &'static str = "always-escaped-params";

    fn discover(&self, function: &Function, inst: &Instruction, domain: &mut Domain<Value>) {
        EscapedParams.discover(function, inst, domain);
    }

    fn transfer(
        &self,
        function: &Function,
        inst: &Instruction,
        input: &DomainValue,
        domain: &Domain<Value>,
    ) -> DomainValue {
        EscapedParams.transfer(function, inst, input, domain)
    }
}

#[test]
fn test_custom_analysis_may_and_must() -> Result<()> {
    let mut b = FunctionBuilder::new("calls", 2);
    let entry = b.create_block();
    let left = b.create_block();
    let right = b.create_block();
    let join = b.create_block();
    b.branch(entry, Value::Param(0), left, right);
    b.call(left, "sink", vec![Value::Param(0)]);
    b.jump(left, join);
    b.call(right, "sink", vec![Value::Param(1)]);
    b.call(right, "sink", vec![Value::Param(0)]);
    b.jump(right, join);
    let ret = b.ret(join, None);
    let function = b.finish()?;

    let may = DataFlowSolver::new(EscapedParams).solve(&function)?;
    assert!(may.holds(ret, &Value::Param(0)));
    assert!(may.holds(ret, &Value::Param(1)));

    let must = DataFlowSolver::new(AlwaysEscapedParams).solve(&function)?;
    assert!(must.holds(ret, &Value::Param(0)));
    assert!(!must.holds(ret, &Value::Param(1)));
    Ok(())
}

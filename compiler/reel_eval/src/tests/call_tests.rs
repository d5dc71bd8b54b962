//! Tests for identifier resolution and the call dispatch ladder.

use pretty_assertions::assert_eq;
use reel_ir::{CallArg, CallArgRange, Expr, Name};

use super::{test_clip, ScriptBuilder, TestEnv};
use crate::{script_error, EvalErrorKind, Value};

#[test]
fn variable_shadows_function_of_same_name() {
    let mut b = ScriptBuilder::new();
    let width = b.name("width");
    let read = b.push(Expr::Var { name: width, frame: -1 });

    let mut env = TestEnv::new().with_var(width, Value::int(640));
    env.register(width, 0, |_| Ok(Value::int(-1)));
    assert_eq!(b.run(read, &mut env).unwrap(), Value::int(640));
    assert!(env.invocations.is_empty());
}

#[test]
fn bare_identifier_calls_zero_arity_function() {
    let mut b = ScriptBuilder::new();
    let version = b.name("version");
    let read = b.push(Expr::Var { name: version, frame: -1 });

    let mut env = TestEnv::new();
    env.register(version, 0, |_| Ok(Value::string("3.7")));
    assert_eq!(b.run(read, &mut env).unwrap(), Value::string("3.7"));
}

#[test]
fn bare_identifier_falls_back_to_unary_function_on_last() {
    let mut b = ScriptBuilder::new();
    let width = b.name("width");
    let read = b.push(Expr::Var { name: width, frame: -1 });

    let clip = test_clip("source");
    let mut env = TestEnv::new().with_var(Name::LAST, Value::clip(clip.clone()));
    env.register(width, 1, move |args| {
        assert_eq!(args[0], Value::clip(clip.clone()));
        Ok(Value::int(1920))
    });
    assert_eq!(b.run(read, &mut env).unwrap(), Value::int(1920));
}

#[test]
fn bare_identifier_tries_frame_and_last_in_runtime_context() {
    let mut b = ScriptBuilder::new();
    let luma = b.name("luma");
    let read = b.push(Expr::Var { name: luma, frame: 9 });

    let clip = test_clip("source");
    let mut env = TestEnv::new().with_var(Name::LAST, Value::clip(clip.clone()));
    env.register(luma, 2, move |args| {
        assert_eq!(args[0], Value::int(9));
        assert_eq!(args[1], Value::clip(clip.clone()));
        Ok(Value::float(0.5))
    });
    assert_eq!(b.run(read, &mut env).unwrap(), Value::float(0.5));
    // get_var miss, then arities 0, 1, 2.
    assert_eq!(
        env.invocations.iter().map(|(_, n)| *n).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn unresolvable_identifier_reports_unknown_name() {
    let mut b = ScriptBuilder::new();
    let nope = b.name("nope");
    let read = b.push(Expr::Var { name: nope, frame: -1 });

    let mut env = TestEnv::new();
    let err = b.run(read, &mut env).unwrap_err();
    assert_eq!(err.message, "I don't know what 'nope' means.");
    assert!(matches!(err.kind, EvalErrorKind::UnknownName { .. }));
}

#[test]
fn call_uses_plain_convention_first_without_frame() {
    let mut b = ScriptBuilder::new();
    let blur = b.name("blur");
    let amount = b.push(Expr::Int(3));
    let args = b.arena.alloc_call_args([CallArg::positional(amount)]);
    let call = b.push(Expr::Call {
        name: blur,
        args,
        oop: false,
        frame: -1,
    });

    let mut env = TestEnv::new();
    env.register(blur, 1, |args| {
        assert_eq!(args[0], Value::int(3));
        Ok(Value::int(30))
    });
    assert_eq!(b.run(call, &mut env).unwrap(), Value::int(30));
}

#[test]
fn call_falls_back_to_last_prefixed_convention() {
    let mut b = ScriptBuilder::new();
    let blur = b.name("blur");
    let amount = b.push(Expr::Int(3));
    let args = b.arena.alloc_call_args([CallArg::positional(amount)]);
    let call = b.push(Expr::Call {
        name: blur,
        args,
        oop: false,
        frame: -1,
    });

    let clip = test_clip("source");
    let mut env = TestEnv::new().with_var(Name::LAST, Value::clip(clip.clone()));
    env.register(blur, 2, move |args| {
        assert_eq!(args[0], Value::clip(clip.clone()));
        assert_eq!(args[1], Value::int(3));
        Ok(Value::int(30))
    });
    assert_eq!(b.run(call, &mut env).unwrap(), Value::int(30));
}

#[test]
fn receiver_call_binds_the_receiver_explicitly() {
    // someClip.f(5): the front end rewrites the receiver into the first
    // explicit argument; last stays out of the picture.
    let mut b = ScriptBuilder::new();
    let f = b.name("f");
    let clip_var = b.name("someClip");
    let receiver = b.push(Expr::Var { name: clip_var, frame: -1 });
    let five = b.push(Expr::Int(5));
    let args = b
        .arena
        .alloc_call_args([CallArg::positional(receiver), CallArg::positional(five)]);
    let call = b.push(Expr::Call {
        name: f,
        args,
        oop: true,
        frame: -1,
    });

    let receiver_clip = test_clip("someClip");
    let mut env = TestEnv::new()
        .with_var(clip_var, Value::clip(receiver_clip.clone()))
        .with_var(Name::LAST, Value::clip(test_clip("other")));
    env.register(f, 2, move |args| {
        assert_eq!(args[0], Value::clip(receiver_clip.clone()));
        assert_eq!(args[1], Value::int(5));
        Ok(Value::int(1))
    });
    assert_eq!(b.run(call, &mut env).unwrap(), Value::int(1));
    assert_eq!(env.last_reads.get(), 0);
}

#[test]
fn receiver_call_never_consults_last() {
    let mut b = ScriptBuilder::new();
    let blur = b.name("blur");
    let amount = b.push(Expr::Int(3));
    let args = b.arena.alloc_call_args([CallArg::positional(amount)]);
    let call = b.push(Expr::Call {
        name: blur,
        args,
        oop: true,
        frame: -1,
    });

    let clip = test_clip("source");
    let mut env = TestEnv::new().with_var(Name::LAST, Value::clip(clip));
    // Only the last-prefixed arity exists, but receiver notation already
    // bound the receiver explicitly, so it must not be retried with last.
    env.register(blur, 2, |_| Ok(Value::int(30)));

    let err = b.run(call, &mut env).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::InvalidArguments { .. }));
    assert_eq!(env.last_reads.get(), 0);
}

#[test]
fn runtime_call_walks_the_full_ladder_in_order() {
    // frame context, first explicit arg is a clip: every convention is
    // tried, in order, before the failure is reported.
    let mut b = ScriptBuilder::new();
    let overlay = b.name("overlay");
    let clip_var = b.name("mask");
    let mask = b.push(Expr::Var { name: clip_var, frame: 7 });
    let opacity = b.push(Expr::Int(50));
    let args = b
        .arena
        .alloc_call_args([CallArg::positional(mask), CallArg::positional(opacity)]);
    let call = b.push(Expr::Call {
        name: overlay,
        args,
        oop: false,
        frame: 7,
    });

    let mut env = TestEnv::new()
        .with_var(clip_var, Value::clip(test_clip("mask")))
        .with_var(Name::LAST, Value::clip(test_clip("source")));
    let err = b.run(call, &mut env).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::NoSuchFunction { .. }));
    assert_eq!(
        err.message,
        "Script error: there is no function named 'overlay'."
    );
    // (frame, args..), (frame, last, args..), (args..), (last, args..)
    assert_eq!(
        env.invocations.iter().map(|(_, n)| *n).collect::<Vec<_>>(),
        vec![3, 4, 2, 3]
    );
}

#[test]
fn frame_convention_binds_the_current_frame() {
    let mut b = ScriptBuilder::new();
    let overlay = b.name("overlay");
    let clip_var = b.name("mask");
    let mask = b.push(Expr::Var { name: clip_var, frame: 7 });
    let args = b.arena.alloc_call_args([CallArg::positional(mask)]);
    let call = b.push(Expr::Call {
        name: overlay,
        args,
        oop: false,
        frame: 7,
    });

    let mask_clip = test_clip("mask");
    let mut env = TestEnv::new().with_var(clip_var, Value::clip(mask_clip.clone()));
    env.register(overlay, 2, move |args| {
        assert_eq!(args[0], Value::int(7));
        assert_eq!(args[1], Value::clip(mask_clip.clone()));
        Ok(Value::int(1))
    });
    assert_eq!(b.run(call, &mut env).unwrap(), Value::int(1));
}

#[test]
fn last_is_read_at_most_once_per_call() {
    // Two conventions want last; the environment must only be asked once.
    let mut b = ScriptBuilder::new();
    let blur = b.name("blur");
    let clip_var = b.name("mask");
    let mask = b.push(Expr::Var { name: clip_var, frame: 7 });
    let args = b.arena.alloc_call_args([CallArg::positional(mask)]);
    let call = b.push(Expr::Call {
        name: blur,
        args,
        oop: false,
        frame: 7,
    });

    let mut env = TestEnv::new()
        .with_var(clip_var, Value::clip(test_clip("mask")))
        .with_var(Name::LAST, Value::clip(test_clip("source")));
    let err = b.run(call, &mut env).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::NoSuchFunction { .. }));
    assert_eq!(env.last_reads.get(), 1);
}

#[test]
fn missing_last_is_not_retried() {
    let mut b = ScriptBuilder::new();
    let blur = b.name("blur");
    let clip_var = b.name("mask");
    let mask = b.push(Expr::Var { name: clip_var, frame: 7 });
    let args = b.arena.alloc_call_args([CallArg::positional(mask)]);
    let call = b.push(Expr::Call {
        name: blur,
        args,
        oop: false,
        frame: 7,
    });

    let mut env = TestEnv::new().with_var(clip_var, Value::clip(test_clip("mask")));
    let err = b.run(call, &mut env).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::NoSuchFunction { .. }));
    assert_eq!(env.last_reads.get(), 1);
    // Conventions needing last are skipped entirely.
    assert_eq!(
        env.invocations.iter().map(|(_, n)| *n).collect::<Vec<_>>(),
        vec![2, 1]
    );
}

#[test]
fn arguments_evaluate_once_across_all_conventions() {
    let mut b = ScriptBuilder::new();
    let blur = b.name("blur");
    let tick = b.name("tick");
    let arg = b.push(Expr::Var { name: tick, frame: -1 });
    let args = b.arena.alloc_call_args([CallArg::positional(arg)]);
    let call = b.push(Expr::Call {
        name: blur,
        args,
        oop: false,
        frame: -1,
    });

    let mut env = TestEnv::new().with_var(Name::LAST, Value::clip(test_clip("source")));
    env.register(tick, 0, |_| Ok(Value::int(1)));
    let err = b.run(call, &mut env).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::NoSuchFunction { .. }));

    let tick_calls = env.invocations.iter().filter(|(n, _)| *n == tick).count();
    assert_eq!(tick_calls, 1);
}

#[test]
fn raised_function_error_stops_dispatch() {
    let mut b = ScriptBuilder::new();
    let blur = b.name("blur");
    let amount = b.push(Expr::Int(3));
    let args = b.arena.alloc_call_args([CallArg::positional(amount)]);
    let call = b.push(Expr::Call {
        name: blur,
        args,
        oop: false,
        frame: -1,
    });

    let mut env = TestEnv::new().with_var(Name::LAST, Value::clip(test_clip("source")));
    env.register(blur, 1, |_| Err(script_error("blur: radius out of range")));
    // A matching arity also exists for the last-prefixed convention, but
    // dispatch must not reach it.
    env.register(blur, 2, |_| Ok(Value::int(0)));

    let err = b.run(call, &mut env).unwrap_err();
    assert_eq!(err.message, "blur: radius out of range");
    assert_eq!(
        env.invocations.iter().map(|(_, n)| *n).collect::<Vec<_>>(),
        vec![1]
    );
}

#[test]
fn failed_call_distinguishes_unknown_from_bad_arguments() {
    let mut b = ScriptBuilder::new();
    let blur = b.name("blur");
    let call = b.push(Expr::Call {
        name: blur,
        args: CallArgRange::EMPTY,
        oop: false,
        frame: -1,
    });

    let mut env = TestEnv::new();
    let err = b.run(call, &mut env).unwrap_err();
    assert_eq!(
        err.message,
        "Script error: there is no function named 'blur'."
    );

    env.register(blur, 3, |_| Ok(Value::Undefined));
    let err = b.run(call, &mut env).unwrap_err();
    assert_eq!(
        err.message,
        "Script error: invalid arguments to function 'blur'."
    );
}

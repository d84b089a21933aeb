/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

//! Compiled mapping programs.
//!
//! Strategies emit a flat list of [`Op`]s over numbered register slots. A
//! [`Program`] is immutable; each call gets its own register file, so one
//! program can map rows on many threads at once.

use std::fmt;
use std::sync::Arc;
use rowcast_core::{Record, Value};
use crate::convert::ScalarConverter;
use crate::errors::MapError;
use crate::shape::{
    AddFn, Boxed, Constructor, DefaultFn, FinishFn, InsertFn, NewDictionaryFn, NewSequenceFn, SetterFn, TupleFn, WrapFn,
};

pub type FactoryFn = Arc<dyn Fn() -> Option<Boxed> + Send + Sync>;
pub type RecordFn = Arc<dyn Fn(&dyn Record) -> Result<Boxed, MapError> + Send + Sync>;

/// Register index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot(pub(crate) usize);

/// Jump target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub(crate) usize);

pub enum Op {
    Scalar { dest: Slot, column: usize, converter: ScalarConverter },
    Default { dest: Slot, make: DefaultFn },
    Construct { dest: Slot, constructor: Constructor, args: Vec<Slot> },
    Factory { dest: Slot, type_name: &'static str, make: FactoryFn },
    /// Delegates to a user map function or another compiled mapper.
    Custom { dest: Slot, map: RecordFn },
    /// The caller-supplied instance of an in-place population.
    Input { dest: Slot },
    Assign { target: Slot, value: Slot, set: SetterFn },
    NewSequence { dest: Slot, capacity: usize, new: NewSequenceFn },
    Push { target: Slot, value: Slot, add: AddFn },
    NewDictionary { dest: Slot, new: NewDictionaryFn },
    Insert { target: Slot, key: String, value: Slot, insert: InsertFn },
    Finish { dest: Slot, src: Slot, finish: FinishFn },
    Wrap { dest: Slot, src: Slot, wrap: WrapFn },
    Tuple { dest: Slot, parts: Vec<Slot>, build: TupleFn },
    /// Name-to-value object over the given (key, column) pairs.
    RowObject { dest: Slot, columns: Vec<(String, usize)> },
    ValueList { dest: Slot, columns: Vec<usize> },
    JumpIfAllNull { columns: Vec<usize>, target: Label },
    Jump { target: Label },
    Label(Label),
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::Scalar { .. } => "scalar",
            Op::Default { .. } => "default",
            Op::Construct { .. } => "construct",
            Op::Factory { .. } => "factory",
            Op::Custom { .. } => "custom",
            Op::Input { .. } => "input",
            Op::Assign { .. } => "assign",
            Op::NewSequence { .. } => "new_sequence",
            Op::Push { .. } => "push",
            Op::NewDictionary { .. } => "new_dictionary",
            Op::Insert { .. } => "insert",
            Op::Finish { .. } => "finish",
            Op::Wrap { .. } => "wrap",
            Op::Tuple { .. } => "tuple",
            Op::RowObject { .. } => "row_object",
            Op::ValueList { .. } => "value_list",
            Op::JumpIfAllNull { .. } => "jump_if_all_null",
            Op::Jump { .. } => "jump",
            Op::Label(_) => "label",
        }
    }
}

impl fmt::Debug for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Scalar { dest, column, converter } => {
                write!(f, "{:?} <- scalar #{} {:?} as {}", dest, column, converter.rule(), converter.member())
            }
            Op::Construct { dest, constructor, args } => write!(f, "{:?} <- {}{:?}", dest, constructor.signature(), args),
            Op::Assign { target, value, .. } => write!(f, "{:?}.set({:?})", target, value),
            Op::Insert { target, key, value, .. } => write!(f, "{:?}[{:?}] = {:?}", target, key, value),
            Op::JumpIfAllNull { columns, target } => write!(f, "if null {:?} goto {:?}", columns, target),
            Op::Jump { target } => write!(f, "goto {:?}", target),
            Op::Label(label) => write!(f, "{:?}:", label),
            other => f.write_str(other.name()),
        }
    }
}

/// Intermediate compile result: preparatory ops plus the slot that holds
/// the value once they have run.
#[derive(Debug)]
pub struct ConstructedValue {
    pub ops: Vec<Op>,
    pub value: Slot,
}

impl ConstructedValue {
    pub fn new(value: Slot) -> ConstructedValue {
        ConstructedValue { ops: Vec::new(), value }
    }

    pub fn single(op: Op, value: Slot) -> ConstructedValue {
        ConstructedValue { ops: vec![op], value }
    }

    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Appends a child's ops and returns the slot holding the child value.
    pub fn splice(&mut self, child: ConstructedValue) -> Slot {
        self.ops.extend(child.ops);
        child.value
    }
}

/// A type-erased `record -> value` function.
pub trait ErasedMapper: Send + Sync {
    /// `input` is the existing instance for in-place population.
    fn map(&self, record: &dyn Record, input: Option<Boxed>) -> Result<Boxed, MapError>;
}

pub struct Program {
    ops: Vec<Op>,
    labels: Vec<usize>,
    slots: usize,
    result: Slot,
}

impl Program {
    pub fn new(value: ConstructedValue, slots: usize, labels: usize) -> Program {
        let mut positions = vec![0; labels];
        for (pos, op) in value.ops.iter().enumerate() {
            if let Op::Label(label) = op {
                positions[label.0] = pos;
            }
        }
        Program {
            ops: value.ops,
            labels: positions,
            slots,
            result: value.value,
        }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn run(&self, record: &dyn Record, mut input: Option<Boxed>) -> Result<Boxed, MapError> {
        let mut regs: Vec<Option<Boxed>> = Vec::with_capacity(self.slots);
        regs.resize_with(self.slots, || None);
        let mut pc = 0;
        while pc < self.ops.len() {
            match &self.ops[pc] {
                Op::Scalar { dest, column, converter } => {
                    regs[dest.0] = Some(converter.convert(record.value(*column))?);
                }
                Op::Default { dest, make } => regs[dest.0] = Some(make()),
                Op::Construct { dest, constructor, args } => {
                    let values = args.iter().map(|slot| take(&mut regs, *slot)).collect::<Result<Vec<_>, _>>()?;
                    regs[dest.0] = Some(constructor.invoke(values)?);
                }
                Op::Factory { dest, type_name, make } => {
                    let value = make().ok_or(MapError::FactoryReturnedNone { type_name: *type_name })?;
                    regs[dest.0] = Some(value);
                }
                Op::Custom { dest, map } => regs[dest.0] = Some(map(record)?),
                Op::Input { dest } => {
                    let value = input.take().ok_or(MapError::TypeMismatch { expected: "existing instance" })?;
                    regs[dest.0] = Some(value);
                }
                Op::Assign { target, value, set } => {
                    let value = take(&mut regs, *value)?;
                    set(slot_mut(&mut regs, *target)?, value)?;
                }
                Op::NewSequence { dest, capacity, new } => regs[dest.0] = Some(new(*capacity)),
                Op::Push { target, value, add } => {
                    let value = take(&mut regs, *value)?;
                    add(slot_mut(&mut regs, *target)?, value)?;
                }
                Op::NewDictionary { dest, new } => regs[dest.0] = Some(new()),
                Op::Insert { target, key, value, insert } => {
                    let value = take(&mut regs, *value)?;
                    insert(slot_mut(&mut regs, *target)?, key.clone(), value)?;
                }
                Op::Finish { dest, src, finish } => {
                    let value = take(&mut regs, *src)?;
                    regs[dest.0] = Some(finish(value)?);
                }
                Op::Wrap { dest, src, wrap } => {
                    let value = take(&mut regs, *src)?;
                    regs[dest.0] = Some(wrap(value)?);
                }
                Op::Tuple { dest, parts, build } => {
                    let values = parts.iter().map(|slot| take(&mut regs, *slot)).collect::<Result<Vec<_>, _>>()?;
                    regs[dest.0] = Some(build(values)?);
                }
                Op::RowObject { dest, columns } => {
                    let mut object = Value::new_object();
                    for (key, column) in columns {
                        object.insert_obj_value(key.as_str(), record.value(*column));
                    }
                    regs[dest.0] = Some(Box::new(object));
                }
                Op::ValueList { dest, columns } => {
                    let list = columns.iter().map(|column| record.value(*column).clone()).collect::<Vec<_>>();
                    regs[dest.0] = Some(Box::new(Value::List(list)));
                }
                Op::JumpIfAllNull { columns, target } => {
                    if columns.iter().all(|column| record.is_null(*column)) {
                        pc = self.labels[target.0];
                        continue;
                    }
                }
                Op::Jump { target } => {
                    pc = self.labels[target.0];
                    continue;
                }
                Op::Label(_) => {}
            }
            pc += 1;
        }
        take(&mut regs, self.result)
    }
}

impl ErasedMapper for Program {
    fn map(&self, record: &dyn Record, input: Option<Boxed>) -> Result<Boxed, MapError> {
        self.run(record, input)
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("ops", &self.ops)
            .field("slots", &self.slots)
            .field("result", &self.result)
            .finish()
    }
}

fn take(regs: &mut [Option<Boxed>], slot: Slot) -> Result<Boxed, MapError> {
    regs.get_mut(slot.0)
        .and_then(Option::take)
        .ok_or(MapError::TypeMismatch { expected: "initialized register" })
}

fn slot_mut(regs: &mut [Option<Boxed>], slot: Slot) -> Result<&mut dyn std::any::Any, MapError> {
    regs.get_mut(slot.0)
        .and_then(|reg| reg.as_deref_mut())
        .ok_or(MapError::TypeMismatch { expected: "initialized register" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcast_core::{Row, RowSchema, ValueKind};
    use crate::convert::ScalarRule;
    use crate::shape::{unbox, Mapped, ShapeKind};

    fn row(values: Vec<Value>) -> Row {
        let schema = RowSchema::default().column("a", ValueKind::I64).column("b", ValueKind::I64);
        Row::new(Arc::new(schema), values)
    }

    fn scalar_op(dest: usize, column: usize) -> Op {
        let target = match i64::shape().kind() {
            ShapeKind::Scalar(scalar) => scalar.clone(),
            _ => unreachable!(),
        };
        Op::Scalar {
            dest: Slot(dest),
            column,
            converter: ScalarConverter::new(ScalarRule::Identity, Some(target), "v".to_string(), "a".to_string()),
        }
    }

    #[test]
    fn jumps_over_all_null_blocks() {
        let mut value = ConstructedValue::new(Slot(1));
        value.push(Op::JumpIfAllNull { columns: vec![0, 1], target: Label(0) });
        value.push(scalar_op(1, 0));
        value.push(Op::Jump { target: Label(1) });
        value.push(Op::Label(Label(0)));
        value.push(Op::Default { dest: Slot(1), make: Arc::new(|| Box::new(-1i64) as Boxed) });
        value.push(Op::Label(Label(1)));
        let program = Program::new(value, 2, 2);

        let mapped = program.run(&row(vec![Value::Bigint(7), Value::Null]), None).unwrap();
        assert_eq!(unbox::<i64>(mapped).unwrap(), 7);
        let mapped = program.run(&row(vec![Value::Null, Value::Null]), None).unwrap();
        assert_eq!(unbox::<i64>(mapped).unwrap(), -1);
    }

    #[test]
    fn factory_none_is_a_row_error() {
        let make: FactoryFn = Arc::new(|| None);
        let program = Program::new(ConstructedValue::single(Op::Factory { dest: Slot(0), type_name: "Thing", make }, Slot(0)), 1, 0);
        let err = program.run(&row(vec![Value::Null, Value::Null]), None).unwrap_err();
        assert!(matches!(err, MapError::FactoryReturnedNone { type_name: "Thing" }));
    }

    #[test]
    fn builds_row_objects() {
        let op = Op::RowObject { dest: Slot(0), columns: vec![("A".to_string(), 0), ("b".to_string(), 1)] };
        let program = Program::new(ConstructedValue::single(op, Slot(0)), 1, 0);
        let mapped = unbox::<Value>(program.run(&row(vec![Value::Bigint(1), Value::Null]), None).unwrap()).unwrap();
        assert_eq!(mapped.get_obj_value("A"), Some(&Value::Bigint(1)));
        assert_eq!(mapped.get_obj_value("b"), Some(&Value::Null));
    }
}

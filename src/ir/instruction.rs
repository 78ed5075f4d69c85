//! SSA instruction set: one variant per opcode
//! (`add sub mul sdiv icmp alloca load store call br condbr ret`), each
//! with a hand-written `Display` rendering its textual form.

use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Integer(i64),
    Name(String),
}

impl Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Integer(i) => write!(f, "{i}"),
            Operand::Name(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Add { dest: String, lhs: Operand, rhs: Operand },
    Sub { dest: String, lhs: Operand, rhs: Operand },
    Mul { dest: String, lhs: Operand, rhs: Operand },
    Sdiv { dest: String, lhs: Operand, rhs: Operand },
    Icmp { dest: String, op: &'static str, lhs: Operand, rhs: Operand },
    Alloca { dest: String },
    Load { dest: String, src: String },
    Store { dest: String, value: Operand },
    Call { dest: String, callee: String, args: Vec<Operand> },
    Br { label: String },
    CondBr { cond: Operand, then_label: String, else_label: String },
    Ret { value: Option<Operand> },
}

impl Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Add { dest, lhs, rhs } => write!(f, "{dest} = add {lhs}, {rhs}"),
            Instruction::Sub { dest, lhs, rhs } => write!(f, "{dest} = sub {lhs}, {rhs}"),
            Instruction::Mul { dest, lhs, rhs } => write!(f, "{dest} = mul {lhs}, {rhs}"),
            Instruction::Sdiv { dest, lhs, rhs } => write!(f, "{dest} = sdiv {lhs}, {rhs}"),
            Instruction::Icmp { dest, op, lhs, rhs } => write!(f, "{dest} = icmp {op} {lhs}, {rhs}"),
            Instruction::Alloca { dest } => write!(f, "{dest} = alloca"),
            Instruction::Load { dest, src } => write!(f, "{dest} = load {src}"),
            Instruction::Store { dest, value } => write!(f, "store {value}, {dest}"),
            Instruction::Call { dest, callee, args } => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{dest} = call @{callee}({})", args.join(", "))
            }
            Instruction::Br { label } => write!(f, "br {label}"),
            Instruction::CondBr { cond, then_label, else_label } => {
                write!(f, "condbr {cond}, {then_label}, {else_label}")
            }
            Instruction::Ret { value } => match value {
                Some(value) => write!(f, "ret {value}"),
                None => write!(f, "ret void"),
            },
        }
    }
}

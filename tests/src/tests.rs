#![cfg(test)]

mod harness;

mod addressing_modes;
mod arith;
mod faults;
mod io;
mod progs;
mod tools;

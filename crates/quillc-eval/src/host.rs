//! Host builtins (§3.3, §4.4). Signatures and stdio behaviour are
//! taken directly from `WrapperFunctions.hpp`: `Write` has no trailing
//! newline, `WriteLine` does; `ReadNumber`/`ReadText` each consume one
//! whitespace-delimited token from stdin, not a full line.

use std::cell::RefCell;
use std::io::{self, Read, Write as IoWrite};

use quillc_par::HostFn;

use crate::error::RuntimeError;
use crate::value::Value;

thread_local! {
    static STDIN: RefCell<io::BufReader<io::Stdin>> =
        RefCell::new(io::BufReader::new(io::stdin()));
}

fn read_token() -> Result<String, RuntimeError> {
    STDIN.with(|cell| {
        let mut reader = cell.borrow_mut();
        let mut byte = [0u8; 1];
        let mut token = String::new();

        loop {
            match reader.read(&mut byte) {
                Ok(0) => return Err(RuntimeError::end_of_input()),
                Ok(_) if (byte[0] as char).is_whitespace() => continue,
                Ok(_) => {
                    token.push(byte[0] as char);
                    break;
                }
                Err(e) => return Err(RuntimeError::io(&e)),
            }
        }

        loop {
            match reader.read(&mut byte) {
                Ok(0) => break,
                Ok(_) if (byte[0] as char).is_whitespace() => break,
                Ok(_) => token.push(byte[0] as char),
                Err(_) => break,
            }
        }

        Ok(token)
    })
}

pub fn call(host: HostFn, args: &[Value]) -> Result<Value, RuntimeError> {
    match host {
        HostFn::Write => {
            print!("{}", args[0]);
            io::stdout().flush().ok();
            Ok(Value::Void)
        }
        HostFn::WriteLine => {
            println!("{}", args[0]);
            Ok(Value::Void)
        }
        HostFn::ReadNumber => {
            let token = read_token()?;
            token
                .parse::<f64>()
                .map(Value::Number)
                .map_err(|_| RuntimeError::type_mismatch("number", "string", 0))
        }
        HostFn::ReadText => Ok(Value::String(read_token()?)),
    }
}

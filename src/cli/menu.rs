//! Interactive menu front-end
//!
//! Thin I/O loop over the engine, registry, and storage glue: it reads
//! choices and values, invokes the corresponding operation, and prints the
//! outcome. No decision logic lives here; every validation and mutation
//! happens inside the engine and registry.

use crate::audit::FileAuditLog;
use crate::core::TransactionEngine;
use crate::storage::{self, StorageBackend};
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Number of audit entries the "recent entries" item shows
const AUDIT_TAIL: usize = 10;

fn print_menu(output: &mut impl Write) -> io::Result<()> {
    writeln!(output, "\n===== Bank Ledger =====")?;
    writeln!(output, "1. Create a new account")?;
    writeln!(output, "2. Deposit money")?;
    writeln!(output, "3. Withdraw money")?;
    writeln!(output, "4. Transfer money")?;
    writeln!(output, "5. View account details")?;
    writeln!(output, "6. List all accounts")?;
    writeln!(output, "7. Save ledger state")?;
    writeln!(output, "8. Load ledger state")?;
    writeln!(output, "9. Show recent audit entries")?;
    writeln!(output, "0. Exit")?;
    writeln!(output, "=======================")
}

/// Read one trimmed line; `None` on end of input
fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    text: &str,
) -> io::Result<Option<String>> {
    write!(output, "{text}")?;
    output.flush()?;
    read_line(input)
}

fn prompt_amount(
    input: &mut impl BufRead,
    output: &mut impl Write,
    text: &str,
) -> io::Result<Option<Decimal>> {
    let Some(raw) = prompt(input, output, text)? else {
        return Ok(None);
    };
    match Decimal::from_str(&raw) {
        Ok(amount) => Ok(Some(amount)),
        Err(_) => {
            writeln!(output, "Please enter a valid number.")?;
            Ok(None)
        }
    }
}

/// Run the interactive loop until the user exits or input ends
pub fn run(
    engine: &TransactionEngine,
    backend: &dyn StorageBackend,
    audit: Option<&FileAuditLog>,
    mut input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    loop {
        print_menu(&mut output)?;

        let Some(choice) = prompt(&mut input, &mut output, "Enter your choice (0-9): ")? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                let Some(name) = prompt(&mut input, &mut output, "Enter account holder name: ")?
                else {
                    break;
                };
                let Some(balance) =
                    prompt_amount(&mut input, &mut output, "Enter initial balance: ")?
                else {
                    continue;
                };

                match engine.create_account(&name, balance) {
                    Ok(id) => {
                        writeln!(output, "Account created successfully! Account ID: {id}")?;
                    }
                    Err(err) => writeln!(output, "Error: {err}")?,
                }
            }
            "2" => {
                let Some(id) = prompt(&mut input, &mut output, "Enter account ID: ")? else {
                    break;
                };
                let Some(amount) =
                    prompt_amount(&mut input, &mut output, "Enter amount to deposit: ")?
                else {
                    continue;
                };

                match engine.deposit(&id, amount) {
                    Ok(balance) => {
                        writeln!(output, "Deposit successful!")?;
                        writeln!(output, "New balance: {balance}")?;
                    }
                    Err(err) => writeln!(output, "Deposit failed: {err}")?,
                }
            }
            "3" => {
                let Some(id) = prompt(&mut input, &mut output, "Enter account ID: ")? else {
                    break;
                };
                let Some(amount) =
                    prompt_amount(&mut input, &mut output, "Enter amount to withdraw: ")?
                else {
                    continue;
                };

                match engine.withdraw(&id, amount) {
                    Ok(balance) => {
                        writeln!(output, "Withdrawal successful!")?;
                        writeln!(output, "New balance: {balance}")?;
                    }
                    Err(err) => writeln!(output, "Withdrawal failed: {err}")?,
                }
            }
            "4" => {
                let Some(from) = prompt(&mut input, &mut output, "Enter source account ID: ")?
                else {
                    break;
                };
                let Some(to) = prompt(&mut input, &mut output, "Enter destination account ID: ")?
                else {
                    break;
                };
                let Some(amount) =
                    prompt_amount(&mut input, &mut output, "Enter amount to transfer: ")?
                else {
                    continue;
                };

                match engine.transfer(&from, &to, amount) {
                    Ok((from_balance, to_balance)) => {
                        writeln!(output, "Transfer successful!")?;
                        writeln!(output, "Source account balance: {from_balance}")?;
                        writeln!(output, "Destination account balance: {to_balance}")?;
                    }
                    Err(err) => writeln!(output, "Transfer failed: {err}")?,
                }
            }
            "5" => {
                let Some(id) = prompt(&mut input, &mut output, "Enter account ID: ")? else {
                    break;
                };

                match engine.registry().get(&id) {
                    Ok(account) => {
                        writeln!(output, "\nAccount ID: {}", account.id)?;
                        writeln!(output, "Name: {}", account.owner_name)?;
                        writeln!(output, "Balance: {}", account.balance)?;
                    }
                    Err(_) => writeln!(output, "Account not found.")?,
                }
            }
            "6" => {
                let accounts = engine.registry().snapshot();
                if accounts.is_empty() {
                    writeln!(output, "No accounts.")?;
                } else {
                    for account in accounts {
                        writeln!(
                            output,
                            "{}  {}  {}",
                            account.id, account.owner_name, account.balance
                        )?;
                    }
                }
            }
            "7" => match storage::persist(backend, engine.registry()) {
                Ok(()) => writeln!(output, "Ledger state saved.")?,
                Err(err) => writeln!(output, "Failed to save ledger state: {err}")?,
            },
            "8" => match storage::restore(backend, engine.registry()) {
                Ok(count) => writeln!(output, "Ledger state loaded ({count} accounts).")?,
                Err(err) => writeln!(output, "Failed to load ledger state: {err}")?,
            },
            "9" => match audit {
                Some(log) => match log.read_all() {
                    Ok(records) => {
                        let start = records.len().saturating_sub(AUDIT_TAIL);
                        if records[start..].is_empty() {
                            writeln!(output, "No audit entries.")?;
                        }
                        for record in &records[start..] {
                            let line = serde_json::to_string(record)
                                .unwrap_or_else(|_| "<unprintable>".to_string());
                            writeln!(output, "{line}")?;
                        }
                    }
                    Err(err) => writeln!(output, "Failed to read audit log: {err}")?,
                },
                None => writeln!(output, "No audit log configured.")?,
            },
            "0" => {
                writeln!(output, "Goodbye!")?;
                break;
            }
            _ => writeln!(output, "Invalid choice. Please try again.")?,
        }
    }

    Ok(())
}

//! Interactive menu session over a [`Roster`].
//!
//! Input is re-prompted until it is well formed, so the roster only ever sees
//! validated names and numbers. End of input ends the session.

use super::{log::log_table, students::students_table};
use crate::error::Result;
use crate::model::{Role, Student, User};
use crate::service::Roster;
use std::io::{self, BufRead, Write};

const MENU: &str = "\nAvailable actions:
1. View all students
2. Update tokens
3. Add new student
4. Remove student
5. View audit log
6. Exit";

pub struct Shell<'a, R, W> {
    roster: &'a mut Roster,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(roster: &'a mut Roster, input: R, output: W) -> Self {
        Self {
            roster,
            input,
            output,
        }
    }

    /// Run until the user exits or input runs out
    pub fn run(&mut self, actor: Option<User>) -> io::Result<()> {
        writeln!(self.output, "Welcome to the student token ledger")?;
        let actor = match actor {
            Some(actor) => actor,
            None => match self.login()? {
                Some(actor) => actor,
                None => return Ok(()),
            },
        };
        tracing::info!(
            first_name = %actor.first_name,
            last_name = %actor.last_name,
            role = %actor.role,
            "session started"
        );

        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(choice) = self.read_int_in("Choose action (1-6): ", 1, 6)? else {
                return Ok(());
            };
            let keep_going = match choice {
                1 => self.view_students()?,
                2 => self.update_tokens(&actor)?,
                3 => self.add_student(&actor)?,
                4 => self.remove_student(&actor)?,
                5 => self.view_log()?,
                _ => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    fn login(&mut self) -> io::Result<Option<User>> {
        let Some(first_name) = self.read_name("Enter your first name: ")? else {
            return Ok(None);
        };
        let Some(last_name) = self.read_name("Enter your last name: ")? else {
            return Ok(None);
        };
        loop {
            let Some(role) = self.read_non_empty("Enter your role (TEACHER/STUDENT): ")? else {
                return Ok(None);
            };
            match role.to_uppercase().parse::<Role>() {
                Ok(role) => return Ok(Some(User::new(first_name, last_name, role))),
                Err(_) => writeln!(
                    self.output,
                    "Invalid role. Please enter either TEACHER or STUDENT."
                )?,
            }
        }
    }

    fn view_students(&mut self) -> io::Result<bool> {
        let students = self.roster.list_students();
        if students.is_empty() {
            writeln!(self.output, "No students on the roster")?;
        } else {
            writeln!(self.output, "{}", students_table(&students))?;
        }
        Ok(true)
    }

    fn view_log(&mut self) -> io::Result<bool> {
        let entries = self.roster.list_audit_log();
        if entries.is_empty() {
            writeln!(self.output, "Audit log is empty")?;
        } else {
            writeln!(self.output, "{}", log_table(&entries))?;
        }
        Ok(true)
    }

    fn update_tokens(&mut self, actor: &User) -> io::Result<bool> {
        let Some((first_name, last_name)) = self.read_full_name("student's")? else {
            return Ok(false);
        };
        let Some(delta) = self.read_int("Enter token amount to add/subtract: ")? else {
            return Ok(false);
        };
        let result = self
            .roster
            .adjust_tokens(&first_name, &last_name, delta, actor)
            .map(|_| ());
        self.report(result, "Tokens updated successfully.")
    }

    fn add_student(&mut self, actor: &User) -> io::Result<bool> {
        let Some((first_name, last_name)) = self.read_full_name("new student's")? else {
            return Ok(false);
        };
        let result = self
            .roster
            .add_student(actor, Student::new(first_name, last_name, 0));
        self.report(result, "Student added successfully.")
    }

    fn remove_student(&mut self, actor: &User) -> io::Result<bool> {
        let Some((first_name, last_name)) = self.read_full_name("student's")? else {
            return Ok(false);
        };
        let result = self.roster.remove_student(&first_name, &last_name, actor);
        self.report(result, "Student removed successfully.")
    }

    fn report(&mut self, result: Result<()>, success: &str) -> io::Result<bool> {
        match result {
            Ok(()) => writeln!(self.output, "{}", success)?,
            Err(e) if e.is_recoverable() => writeln!(self.output, "Error: {}", e)?,
            Err(e) => {
                tracing::error!(error = %e, "operation failed");
                writeln!(self.output, "Unexpected error: {}", e)?;
            }
        }
        Ok(true)
    }

    fn read_full_name(&mut self, whose: &str) -> io::Result<Option<(String, String)>> {
        let Some(first) = self.read_name(&format!("Enter {} first name: ", whose))? else {
            return Ok(None);
        };
        let Some(last) = self.read_name(&format!("Enter {} last name: ", whose))? else {
            return Ok(None);
        };
        Ok(Some((first, last)))
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn read_non_empty(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            match self.read_line(prompt)? {
                None => return Ok(None),
                Some(line) if line.is_empty() => {
                    writeln!(self.output, "Input cannot be empty. Please try again.")?
                }
                Some(line) => return Ok(Some(line)),
            }
        }
    }

    fn read_name(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            let Some(name) = self.read_non_empty(prompt)? else {
                return Ok(None);
            };
            if is_valid_name(&name) {
                return Ok(Some(name));
            }
            writeln!(
                self.output,
                "Invalid input. Only letters and hyphens are allowed."
            )?;
        }
    }

    fn read_int(&mut self, prompt: &str) -> io::Result<Option<i64>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            match line.parse::<i64>() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => writeln!(self.output, "Invalid input. Please enter a valid number.")?,
            }
        }
    }

    fn read_int_in(&mut self, prompt: &str, min: i64, max: i64) -> io::Result<Option<i64>> {
        loop {
            let Some(n) = self.read_int(prompt)? else {
                return Ok(None);
            };
            if (min..=max).contains(&n) {
                return Ok(Some(n));
            }
            writeln!(
                self.output,
                "Input must be between {} and {}. Please try again.",
                min, max
            )?;
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphabetic() || c == '-')
}

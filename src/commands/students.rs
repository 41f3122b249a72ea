use crate::error::{Error, Result};
use crate::model::{Student, User};
use crate::service::Roster;
use comfy_table::{CellAlignment, Table, presets::UTF8_FULL};

/// Render students as a table, in roster order
pub fn students_table(students: &[Student]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["FIRST NAME", "LAST NAME", "TOKENS"]);
    for student in students {
        table.add_row(vec![
            student.first_name.clone(),
            student.last_name.clone(),
            student.tokens.to_string(),
        ]);
    }
    if let Some(column) = table.column_mut(2) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

pub fn list(roster: &Roster) -> Result<()> {
    let students = roster.list_students();
    if students.is_empty() {
        println!("No students on the roster");
        return Ok(());
    }
    println!("{}", students_table(&students));
    Ok(())
}

pub fn find(roster: &Roster, first_name: &str, last_name: &str) -> Result<()> {
    match roster.find_student(first_name, last_name) {
        Some(student) => {
            println!(
                "{} {}: {} tokens",
                student.first_name, student.last_name, student.tokens
            );
            Ok(())
        }
        None => Err(Error::NotFound(format!(
            "Student not found: {} {}",
            first_name, last_name
        ))),
    }
}

pub fn add(roster: &mut Roster, actor: &User, student: Student) -> Result<()> {
    let name = format!("{} {}", student.first_name, student.last_name);
    roster.add_student(actor, student)?;
    println!("Student added: {}", name);
    Ok(())
}

pub fn remove(roster: &mut Roster, actor: &User, first_name: &str, last_name: &str) -> Result<()> {
    roster.remove_student(first_name, last_name, actor)?;
    println!("Student removed: {} {}", first_name, last_name);
    Ok(())
}

pub fn expel(roster: &mut Roster, actor: &User, first_name: &str, last_name: &str) -> Result<()> {
    roster.expel_student(actor, first_name, last_name)?;
    println!("Student expelled: {} {}", first_name, last_name);
    Ok(())
}

pub fn adjust(
    roster: &mut Roster,
    actor: &User,
    first_name: &str,
    last_name: &str,
    delta: i64,
) -> Result<()> {
    let balance = roster.adjust_tokens(first_name, last_name, delta, actor)?;
    println!(
        "Tokens updated: {} {} now has {} tokens",
        first_name, last_name, balance
    );
    Ok(())
}

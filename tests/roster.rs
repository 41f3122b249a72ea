use tokenbook::{Action, Config, Error, Role, Roster, Student, User};

struct Fixture {
    dir: tempfile::TempDir,
    teacher: User,
    student: User,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            dir: tempfile::tempdir().expect("tempdir"),
            teacher: User::new("John", "Doe", Role::Teacher),
            student: User::new("Jane", "Smith", Role::Student),
        }
    }

    fn config(&self) -> Config {
        Config::new(
            self.dir.path().join("data/students.csv"),
            self.dir.path().join("data/logs.csv"),
        )
        .expect("config")
    }

    fn open(&self) -> Roster {
        Roster::open(&self.config()).expect("open roster")
    }
}

#[test]
fn fresh_files_add_first_student() {
    let fx = Fixture::new();
    let mut roster = fx.open();

    roster
        .add_student(&fx.teacher, Student::new("Alice", "Smith", 0))
        .unwrap();

    assert_eq!(roster.list_students(), vec![Student::new("Alice", "Smith", 0)]);
    let log = roster.list_audit_log();
    assert_eq!(log.len(), 1);
    assert!(log[0].is(Action::AddStudent));
    assert_eq!(log[0].actor_first_name, "John");
    assert_eq!(log[0].actor_last_name, "Doe");
    assert_eq!(log[0].actor_role, Role::Teacher);
}

#[test]
fn token_adjustments_can_go_negative() {
    let fx = Fixture::new();
    let mut roster = fx.open();
    roster
        .add_student(&fx.teacher, Student::new("Bob", "Lee", 10))
        .unwrap();

    roster.adjust_tokens("Bob", "Lee", 5, &fx.teacher).unwrap();
    assert_eq!(roster.find_student("Bob", "Lee").unwrap().tokens, 15);

    roster.adjust_tokens("Bob", "Lee", -20, &fx.teacher).unwrap();
    assert_eq!(roster.find_student("Bob", "Lee").unwrap().tokens, -5);
}

#[test]
fn student_role_cannot_mutate() {
    let fx = Fixture::new();
    let mut roster = fx.open();
    roster
        .add_student(&fx.teacher, Student::new("Dana", "Kim", 4))
        .unwrap();
    let students_before = roster.list_students();
    let log_before = roster.list_audit_log();

    let results = [
        roster.add_student(&fx.student, Student::new("Carl", "Young", 0)),
        roster.remove_student("Dana", "Kim", &fx.student),
        roster.expel_student(&fx.student, "Dana", "Kim"),
        roster.adjust_tokens("Dana", "Kim", 100, &fx.student).map(|_| ()),
    ];
    for result in results {
        assert!(matches!(result, Err(Error::Authorization(_))));
    }

    assert_eq!(roster.list_students(), students_before);
    assert_eq!(roster.list_audit_log(), log_before);

    let reopened = fx.open();
    assert_eq!(reopened.list_students(), students_before);
    assert_eq!(reopened.list_audit_log().len(), 1);
}

#[test]
fn remove_missing_student_is_not_found() {
    let fx = Fixture::new();
    let mut roster = fx.open();

    let err = roster
        .remove_student("NoSuch", "Body", &fx.teacher)
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(roster.list_audit_log().is_empty());
}

#[test]
fn duplicate_add_conflicts() {
    let fx = Fixture::new();
    let mut roster = fx.open();

    roster
        .add_student(&fx.teacher, Student::new("Dana", "Kim", 0))
        .unwrap();
    let err = roster
        .add_student(&fx.teacher, Student::new("Dana", "Kim", 0))
        .unwrap_err();

    assert!(matches!(err, Error::Conflict(_)));
    let matching = roster
        .list_students()
        .into_iter()
        .filter(|s| s.is_named("Dana", "Kim"))
        .count();
    assert_eq!(matching, 1);
}

#[test]
fn every_mutation_logs_exactly_once() {
    let fx = Fixture::new();
    let mut roster = fx.open();

    roster
        .add_student(&fx.teacher, Student::new("Alice", "Smith", 5))
        .unwrap();
    roster
        .add_student(&fx.teacher, Student::new("Bob", "Wilson", 10))
        .unwrap();
    roster.adjust_tokens("Bob", "Wilson", 3, &fx.teacher).unwrap();
    roster.remove_student("Alice", "Smith", &fx.teacher).unwrap();
    roster.expel_student(&fx.teacher, "Bob", "Wilson").unwrap();

    let actions: Vec<String> = roster
        .list_audit_log()
        .into_iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            "ADD_STUDENT",
            "ADD_STUDENT",
            "UPDATE_TOKENS",
            "REMOVE_STUDENT",
            "EXPEL_STUDENT"
        ]
    );
    assert!(roster.list_students().is_empty());
}

#[test]
fn state_survives_reopen() {
    let fx = Fixture::new();
    {
        let mut roster = fx.open();
        roster
            .add_student(&fx.teacher, Student::new("Alice", "Johnson", 0))
            .unwrap();
        roster
            .add_student(&fx.teacher, Student::new("Bob", "Wilson", 10))
            .unwrap();
        roster.adjust_tokens("Alice", "Johnson", 7, &fx.teacher).unwrap();
    }

    let roster = fx.open();
    assert_eq!(
        roster.list_students(),
        vec![
            Student::new("Alice", "Johnson", 7),
            Student::new("Bob", "Wilson", 10)
        ]
    );
    let log = roster.list_audit_log();
    assert_eq!(log.len(), 3);
    assert_eq!(log[2].details, "Updated tokens for Alice Johnson: 0 -> 7");

    let students_csv =
        std::fs::read_to_string(fx.dir.path().join("data/students.csv")).unwrap();
    assert_eq!(
        students_csv,
        "firstName,lastName,tokens\nAlice,Johnson,7\nBob,Wilson,10\n"
    );
}

#[test]
fn snapshots_are_copies() {
    let fx = Fixture::new();
    let mut roster = fx.open();
    roster
        .add_student(&fx.teacher, Student::new("Alice", "Smith", 1))
        .unwrap();

    let mut snapshot = roster.list_students();
    snapshot[0].tokens = 99;
    snapshot.clear();

    assert_eq!(roster.find_student("Alice", "Smith").unwrap().tokens, 1);
}

#[test]
fn corrupt_lines_do_not_block_startup() {
    let fx = Fixture::new();
    let data = fx.dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("students.csv"),
        "firstName,lastName,tokens\nAlice,Smith,3\nBob,Lee,lots\nEve,Stone,-1\n",
    )
    .unwrap();
    std::fs::write(
        data.join("logs.csv"),
        "timestamp,action,userFirstName,userLastName,userRole,details\n\
         2024-01-01 10:00:00,ADD_STUDENT,John,Doe,TEACHER,Added student: Alice Smith with 3 tokens\n\
         yesterday,ADD_STUDENT,John,Doe,TEACHER,bad timestamp\n\
         2024-01-01 10:05:00,ADD_STUDENT,John,Doe,PRINCIPAL,bad role\n",
    )
    .unwrap();

    let roster = fx.open();
    assert_eq!(
        roster.list_students(),
        vec![Student::new("Alice", "Smith", 3), Student::new("Eve", "Stone", -1)]
    );
    assert_eq!(roster.list_audit_log().len(), 1);
}

#[test]
fn wrong_header_reads_as_empty() {
    let fx = Fixture::new();
    let data = fx.dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join("students.csv"), "name,tokens\nAlice,3\n").unwrap();

    let mut roster = fx.open();
    assert!(roster.list_students().is_empty());

    roster
        .add_student(&fx.teacher, Student::new("Bob", "Lee", 0))
        .unwrap();
    let students_csv = std::fs::read_to_string(data.join("students.csv")).unwrap();
    assert_eq!(students_csv, "firstName,lastName,tokens\nBob,Lee,0\n");
}

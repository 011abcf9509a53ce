//! Database operations for saving goals.

use rusqlite::Connection;

use crate::{
    Error,
    db::{delete_row, ensure_updated},
    saving_goal::core::{NewSavingGoal, SavingGoal, SavingGoalId, map_row_to_saving_goal},
};

const SELECT_SAVING_GOAL: &str = "SELECT
        saving_goal.id,
        saving_goal.family_member_id,
        family_member.name,
        family_member.designation,
        saving_goal.name,
        saving_goal.description,
        saving_goal.start_date,
        saving_goal.end_date,
        saving_goal.target_amount,
        saving_goal.goal_type,
        saving_goal.status
    FROM saving_goal
    INNER JOIN family_member ON family_member.id = saving_goal.family_member_id";

/// Retrieve every saving goal, latest start date first.
pub fn list_saving_goals(connection: &Connection) -> Result<Vec<SavingGoal>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_SAVING_GOAL} ORDER BY saving_goal.start_date DESC, saving_goal.id ASC;"
        ))?
        .query_map([], map_row_to_saving_goal)?
        .map(|maybe_goal| maybe_goal.map_err(Error::from))
        .collect()
}

/// Retrieve a single saving goal by ID.
pub fn get_saving_goal(id: SavingGoalId, connection: &Connection) -> Result<SavingGoal, Error> {
    connection
        .prepare(&format!("{SELECT_SAVING_GOAL} WHERE saving_goal.id = :id;"))?
        .query_row(&[(":id", &id)], map_row_to_saving_goal)
        .map_err(Error::from)
}

/// Create a saving goal and return it with its generated ID.
///
/// # Errors
/// Returns [Error::InvalidReference] if the family member does not exist.
pub fn create_saving_goal(
    goal: &NewSavingGoal,
    connection: &Connection,
) -> Result<SavingGoal, Error> {
    connection.execute(
        "INSERT INTO saving_goal
            (family_member_id, name, description, start_date, end_date, target_amount, goal_type, status)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
        (
            goal.family_member_id,
            &goal.name,
            &goal.description,
            goal.start_date,
            goal.end_date,
            goal.target_amount,
            goal.goal_type,
            goal.status,
        ),
    )?;

    get_saving_goal(connection.last_insert_rowid(), connection)
}

/// Overwrite the saving goal with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no saving goal with `id` or
/// [Error::InvalidReference] if the family member does not exist.
pub fn update_saving_goal(
    id: SavingGoalId,
    goal: &NewSavingGoal,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE saving_goal
        SET family_member_id = ?1, name = ?2, description = ?3, start_date = ?4, end_date = ?5,
            target_amount = ?6, goal_type = ?7, status = ?8
        WHERE id = ?9",
        (
            goal.family_member_id,
            &goal.name,
            &goal.description,
            goal.start_date,
            goal.end_date,
            goal.target_amount,
            goal.goal_type,
            goal.status,
            id,
        ),
    )?;

    ensure_updated(rows_affected)
}

/// Delete the saving goal with `id`.
pub fn delete_saving_goal(id: SavingGoalId, connection: &Connection) -> Result<(), Error> {
    delete_row("saving_goal", id, connection)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error,
        family_member::{Designation, NewFamilyMember, create_family_member},
        initialize_db,
        saving_goal::core::{GoalStatus, GoalType, NewSavingGoal, SavingGoal},
    };

    use super::{
        create_saving_goal, delete_saving_goal, get_saving_goal, list_saving_goals,
        update_saving_goal,
    };

    fn get_test_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialise database");
        create_family_member(
            &NewFamilyMember {
                name: "Otieno".to_owned(),
                designation: Designation::Dad,
            },
            &connection,
        )
        .expect("Could not create test family member");
        connection
    }

    fn new_goal(name: &str, start_date: Date) -> NewSavingGoal {
        NewSavingGoal {
            family_member_id: 1,
            name: name.to_owned(),
            description: None,
            start_date,
            end_date: None,
            target_amount: 10_000.0,
            goal_type: GoalType::Flexible,
            status: GoalStatus::Active,
        }
    }

    #[test]
    fn create_joins_family_member() {
        let connection = get_test_connection();
        let goal = NewSavingGoal {
            description: Some("Term 1".to_owned()),
            end_date: Some(date!(2024 - 12 - 31)),
            ..new_goal("School fees", date!(2024 - 01 - 01))
        };

        let created = create_saving_goal(&goal, &connection).unwrap();

        assert_eq!(
            created,
            SavingGoal {
                id: 1,
                family_member_id: 1,
                family_member_name: "Otieno".to_owned(),
                family_member_designation: Designation::Dad,
                name: "School fees".to_owned(),
                description: Some("Term 1".to_owned()),
                start_date: date!(2024 - 01 - 01),
                end_date: Some(date!(2024 - 12 - 31)),
                target_amount: 10_000.0,
                goal_type: GoalType::Flexible,
                status: GoalStatus::Active,
            }
        );
    }

    #[test]
    fn list_orders_by_start_date_descending() {
        let connection = get_test_connection();
        create_saving_goal(&new_goal("Car", date!(2023 - 06 - 01)), &connection).unwrap();
        create_saving_goal(&new_goal("Holiday", date!(2024 - 03 - 01)), &connection).unwrap();
        create_saving_goal(&new_goal("Emergency", date!(2024 - 03 - 01)), &connection).unwrap();

        let goals = list_saving_goals(&connection).unwrap();

        let names: Vec<_> = goals.iter().map(|goal| goal.name.as_str()).collect();
        assert_eq!(names, vec!["Holiday", "Emergency", "Car"]);
    }

    #[test]
    fn update_overwrites_status() {
        let connection = get_test_connection();
        let goal = create_saving_goal(&new_goal("Car", date!(2023 - 06 - 01)), &connection).unwrap();

        update_saving_goal(
            goal.id,
            &NewSavingGoal {
                status: GoalStatus::Completed,
                goal_type: GoalType::Challenge,
                ..new_goal("Car", date!(2023 - 06 - 01))
            },
            &connection,
        )
        .unwrap();

        let updated = get_saving_goal(goal.id, &connection).unwrap();
        assert_eq!(updated.status, GoalStatus::Completed);
        assert_eq!(updated.goal_type, GoalType::Challenge);
    }

    #[test]
    fn update_missing_goal_is_not_found() {
        let connection = get_test_connection();

        assert_eq!(
            update_saving_goal(5, &new_goal("Car", date!(2023 - 06 - 01)), &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_is_idempotent() {
        let connection = get_test_connection();
        let goal = create_saving_goal(&new_goal("Car", date!(2023 - 06 - 01)), &connection).unwrap();

        assert_eq!(delete_saving_goal(goal.id, &connection), Ok(()));
        assert_eq!(delete_saving_goal(goal.id, &connection), Ok(()));
        assert_eq!(list_saving_goals(&connection), Ok(vec![]));
    }
}

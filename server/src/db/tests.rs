//! Database Integration Tests

#[cfg(test)]
mod postgres_tests {
    use super::super::*;
    use crate::permissions::{load_program_domain, Principal, Role};
    use sqlx::PgPool;
    use uuid::Uuid;

    async fn insert_lecturer(pool: &PgPool, first_name: &str) -> Uuid {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO lecturers (id, first_name, title, employment_type) VALUES ($1, $2, 'Prof.', 'Full time')",
        )
        .bind(id)
        .bind(first_name)
        .execute(pool)
        .await
        .expect("Failed to insert lecturer");
        id
    }

    async fn insert_program(pool: &PgPool, name: &str, acronym: &str, head: Option<Uuid>) -> Uuid {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO study_programs (id, name, acronym, start_date, total_ects, head_of_program_id) VALUES ($1, $2, $3, '2025-10-01', 180, $4)",
        )
        .bind(id)
        .bind(name)
        .bind(acronym)
        .bind(head)
        .execute(pool)
        .await
        .expect("Failed to insert program");
        id
    }

    // ========================================================================
    // User Tests
    // ========================================================================

    #[sqlx::test]
    async fn test_create_and_find_user(pool: PgPool) {
        let lecturer = insert_lecturer(&pool, "Ada").await;
        let user = create_user(&pool, "Ada@Example.com", "hash", Role::Lecturer, Some(lecturer))
            .await
            .expect("Failed to create user");

        assert_eq!(user.role, Role::Lecturer);
        assert_eq!(user.lecturer_id, Some(lecturer));

        let found = find_user_by_id(&pool, user.id)
            .await
            .expect("Query failed")
            .expect("User not found");
        assert_eq!(found.email, "Ada@Example.com");

        let found = find_user_by_email(&pool, "ada@example.com")
            .await
            .expect("Query failed")
            .expect("User not found");
        assert_eq!(found.id, user.id);
    }

    #[sqlx::test]
    async fn test_email_uniqueness(pool: PgPool) {
        create_user(&pool, "dup@example.com", "hash", Role::Student, None)
            .await
            .expect("First insert should succeed");

        let err = create_user(&pool, "dup@example.com", "hash", Role::Student, None)
            .await
            .expect_err("Second insert should fail");
        match err {
            sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[sqlx::test]
    async fn test_find_missing_user(pool: PgPool) {
        let found = find_user_by_id(&pool, Uuid::now_v7())
            .await
            .expect("Query failed");
        assert!(found.is_none());
    }

    // ========================================================================
    // Program Domain Tests
    // ========================================================================

    #[sqlx::test]
    async fn test_program_domain_is_programs_headed(pool: PgPool) {
        let head = insert_lecturer(&pool, "Grace").await;
        let other = insert_lecturer(&pool, "Alan").await;
        let cs = insert_program(&pool, "Computer Science", "CS", Some(head)).await;
        let ds = insert_program(&pool, "Data Science", "DS", Some(head)).await;
        let bio = insert_program(&pool, "Biology", "BIO", Some(other)).await;

        let principal = Principal::new(Uuid::now_v7(), Role::Hosp, Some(head));
        let domain = load_program_domain(&pool, &principal)
            .await
            .expect("Query failed");

        assert!(domain.contains(cs));
        assert!(domain.contains(ds));
        assert!(!domain.contains(bio));
        assert!(domain.matches_label("cs"));
        assert!(!domain.matches_label("Biology"));
    }

    #[sqlx::test]
    async fn test_program_domain_empty_for_other_roles(pool: PgPool) {
        let head = insert_lecturer(&pool, "Grace").await;
        insert_program(&pool, "Computer Science", "CS", Some(head)).await;

        for role in [Role::Admin, Role::Lecturer, Role::Student] {
            let principal = Principal::new(Uuid::now_v7(), role, Some(head));
            let domain = load_program_domain(&pool, &principal)
                .await
                .expect("Query failed");
            assert!(domain.is_empty(), "{role:?}");
        }

        let unlinked = Principal::new(Uuid::now_v7(), Role::Hosp, None);
        let domain = load_program_domain(&pool, &unlinked)
            .await
            .expect("Query failed");
        assert!(domain.is_empty());
    }

    #[sqlx::test]
    async fn test_seeded_constraint_types(pool: PgPool) {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM constraint_types")
            .fetch_one(&pool)
            .await
            .expect("Query failed");
        assert_eq!(count.0, 5);
    }
}

use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            email VARCHAR(255) NOT NULL,
            name VARCHAR(255) NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            email_confirmed BOOLEAN NOT NULL DEFAULT FALSE,
            two_factor_enabled BOOLEAN NOT NULL DEFAULT TRUE,
            roles TEXT[] NOT NULL DEFAULT '{User}',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table; times are wall-clock values as entered
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            description TEXT NULL,
            start_time TIMESTAMP NOT NULL,
            end_time TIMESTAMP NOT NULL,
            location VARCHAR(255) NULL,
            is_confirmed BOOLEAN NOT NULL DEFAULT FALSE,
            is_cancelled BOOLEAN NOT NULL DEFAULT FALSE,
            cancellation_reason TEXT NULL,
            meeting_link VARCHAR(1024) NULL,
            send_reminder BOOLEAN NOT NULL DEFAULT TRUE,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            user_email VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create sessions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token VARCHAR(255) PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            expires_at TIMESTAMP WITH TIME ZONE NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create auth_tokens table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS auth_tokens (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            purpose VARCHAR(64) NOT NULL,
            token VARCHAR(255) NOT NULL,
            expires_at TIMESTAMP WITH TIME ZONE NOT NULL,
            consumed_at TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create email_logs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS email_logs (
            id BIGSERIAL PRIMARY KEY,
            to_addresses TEXT NOT NULL,
            bcc_addresses TEXT NULL,
            from_name VARCHAR(255) NOT NULL,
            from_address VARCHAR(255) NOT NULL,
            subject VARCHAR(1024) NOT NULL,
            body TEXT NOT NULL,
            sent_date TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            user_id BIGINT NULL REFERENCES users(id) ON DELETE SET NULL,
            full_user_name VARCHAR(255) NULL,
            is_body_html BOOLEAN NOT NULL DEFAULT FALSE,
            resent_email BOOLEAN NOT NULL DEFAULT FALSE,
            error_message TEXT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes, one statement per query for the extended protocol
    let indexes = [
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(LOWER(email))",
        "CREATE INDEX IF NOT EXISTS idx_appointments_start_time ON appointments(start_time)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_user_id ON appointments(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at)",
        "CREATE INDEX IF NOT EXISTS idx_auth_tokens_lookup ON auth_tokens(user_id, purpose)",
        "CREATE INDEX IF NOT EXISTS idx_email_logs_user_id ON email_logs(user_id)",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}

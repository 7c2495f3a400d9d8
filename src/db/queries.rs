use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    Appointment, AppointmentStatus, Feedback, Role, ServiceKind, StaffUnavailability, User,
};

const DATE_FMT: &str = "%Y-%m-%d";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

// ── Accounts ──

pub struct AccountRecord {
    pub user: User,
    pub hash_pass: String,
}

pub fn create_account(
    conn: &Connection,
    username: &str,
    fullname: &str,
    email: &str,
    hash_pass: &str,
    role: Role,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO accounts (username, fullname, email, hash_pass, role)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![username, fullname, email, hash_pass, role.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_account_by_login(
    conn: &Connection,
    username_or_email: &str,
) -> anyhow::Result<Option<AccountRecord>> {
    let result = conn.query_row(
        "SELECT id, username, fullname, email, hash_pass, role
         FROM accounts WHERE username = ?1 OR email = ?1",
        params![username_or_email],
        |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        },
    );

    match result {
        Ok((id, username, fullname, email, hash_pass, role)) => Ok(Some(AccountRecord {
            user: User {
                id,
                username,
                fullname,
                email,
                role: Role::parse(&role).unwrap_or(Role::Client),
            },
            hash_pass,
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_account(conn: &Connection, id: i64) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, username, fullname, email, role FROM accounts WHERE id = ?1",
        params![id],
        |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                fullname: row.get(2)?,
                email: row.get(3)?,
                role: Role::parse(&row.get::<_, String>(4)?).unwrap_or(Role::Client),
            })
        },
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_account_by_username(conn: &Connection, username: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, username, fullname, email, role FROM accounts WHERE username = ?1",
        params![username],
        |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                fullname: row.get(2)?,
                email: row.get(3)?,
                role: Role::parse(&row.get::<_, String>(4)?).unwrap_or(Role::Client),
            })
        },
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn username_or_email_taken(
    conn: &Connection,
    username: &str,
    email: &str,
) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM accounts WHERE username = ?1 OR email = ?2",
        params![username, email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn email_exists(conn: &Connection, email: &str) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM accounts WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn update_password_by_username(
    conn: &Connection,
    username: &str,
    hash_pass: &str,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE accounts SET hash_pass = ?1 WHERE username = ?2",
        params![hash_pass, username],
    )?;
    Ok(count > 0)
}

pub fn update_password_by_email(
    conn: &Connection,
    email: &str,
    hash_pass: &str,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE accounts SET hash_pass = ?1 WHERE email = ?2",
        params![hash_pass, email],
    )?;
    Ok(count > 0)
}

pub fn get_password_hash(conn: &Connection, username: &str) -> anyhow::Result<Option<String>> {
    let result = conn.query_row(
        "SELECT hash_pass FROM accounts WHERE username = ?1",
        params![username],
        |row| row.get::<_, String>(0),
    );

    match result {
        Ok(hash) => Ok(Some(hash)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_staff_by_role(conn: &Connection, role: Role) -> anyhow::Result<Vec<(i64, String)>> {
    let mut stmt = conn.prepare(
        "SELECT id, fullname FROM accounts WHERE role = ?1 ORDER BY fullname ASC",
    )?;
    let rows = stmt.query_map(params![role.as_str()], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut staff = vec![];
    for row in rows {
        staff.push(row?);
    }
    Ok(staff)
}

pub fn list_users(
    conn: &Connection,
    role_filter: Option<Role>,
    sort: &str,
    page: i64,
    per_page: i64,
) -> anyhow::Result<(Vec<User>, i64)> {
    let mut where_sql = String::new();
    let mut filter_params: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];
    if let Some(role) = role_filter {
        where_sql = "WHERE role = ?1".to_string();
        filter_params.push(Box::new(role.as_str().to_string()));
    }

    let order_sql = match sort {
        "name_desc" => "fullname DESC",
        "username" => "username ASC",
        "username_desc" => "username DESC",
        "role" => "role ASC",
        "role_desc" => "role DESC",
        _ => "fullname ASC",
    };

    let count_sql = format!("SELECT COUNT(*) FROM accounts {where_sql}");
    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        filter_params.iter().map(|p| p.as_ref()).collect();
    let total: i64 = conn.query_row(&count_sql, param_refs.as_slice(), |row| row.get(0))?;

    let offset = (page - 1).max(0) * per_page;
    let sql = format!(
        "SELECT id, username, fullname, email, role FROM accounts {where_sql}
         ORDER BY {order_sql} LIMIT {per_page} OFFSET {offset}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(param_refs.as_slice(), |row| {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            fullname: row.get(2)?,
            email: row.get(3)?,
            role: Role::parse(&row.get::<_, String>(4)?).unwrap_or(Role::Client),
        })
    })?;

    let mut users = vec![];
    for row in rows {
        users.push(row?);
    }
    Ok((users, total))
}

pub fn count_clients(conn: &Connection) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM accounts WHERE role = 'Client'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ── Appointments ──

pub fn create_appointment(conn: &Connection, apt: &Appointment) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO appointments
             (id, account_id, fullname, service, appointment_date, time, remarks, status, staff_id, staff_name, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            apt.id,
            apt.account_id,
            apt.fullname,
            apt.service.as_str(),
            apt.date.format(DATE_FMT).to_string(),
            apt.time,
            apt.remarks,
            apt.status.as_str(),
            apt.staff_id,
            apt.staff_name,
            apt.created_at.format(DATETIME_FMT).to_string(),
            apt.updated_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

const APPOINTMENT_COLUMNS: &str = "id, account_id, fullname, service, appointment_date, time, remarks, status, staff_id, staff_name, created_at, updated_at";

fn parse_appointment_row(row: &rusqlite::Row) -> anyhow::Result<Appointment> {
    let id: String = row.get(0)?;
    let account_id: i64 = row.get(1)?;
    let fullname: String = row.get(2)?;
    let service_str: String = row.get(3)?;
    let date_str: String = row.get(4)?;
    let time: String = row.get(5)?;
    let remarks: String = row.get(6)?;
    let status_str: String = row.get(7)?;
    let staff_id: i64 = row.get(8)?;
    let staff_name: String = row.get(9)?;
    let created_at_str: String = row.get(10)?;
    let updated_at_str: String = row.get(11)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FMT)
        .unwrap_or_else(|_| Utc::now().date_naive());
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, DATETIME_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, DATETIME_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Appointment {
        id,
        account_id,
        fullname,
        service: ServiceKind::parse(&service_str).unwrap_or(ServiceKind::Haircut),
        date,
        time,
        remarks,
        status: AppointmentStatus::parse(&status_str).unwrap_or(AppointmentStatus::Pending),
        staff_id,
        staff_name,
        created_at,
        updated_at,
    })
}

pub fn get_appointment(conn: &Connection, id: &str) -> anyhow::Result<Option<Appointment>> {
    let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_appointment_row(row)));

    match result {
        Ok(apt) => Ok(Some(apt?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn appointments_for_account(
    conn: &Connection,
    account_id: i64,
) -> anyhow::Result<Vec<Appointment>> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE account_id = ?1 ORDER BY appointment_date DESC, time DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![account_id], |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

pub fn update_appointment_status(
    conn: &Connection,
    id: &str,
    status: AppointmentStatus,
) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format(DATETIME_FMT).to_string();
    let count = conn.execute(
        "UPDATE appointments SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn slot_taken(
    conn: &Connection,
    date: NaiveDate,
    time: &str,
    staff_id: i64,
) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM appointments
         WHERE appointment_date = ?1 AND time = ?2 AND staff_id = ?3 AND status != 'Cancelled'",
        params![date.format(DATE_FMT).to_string(), time, staff_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn booked_slots(conn: &Connection, date: NaiveDate, staff_id: i64) -> anyhow::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT time FROM appointments
         WHERE appointment_date = ?1 AND staff_id = ?2 AND status != 'Cancelled'",
    )?;
    let rows = stmt.query_map(
        params![date.format(DATE_FMT).to_string(), staff_id],
        |row| row.get::<_, String>(0),
    )?;

    let mut slots = vec![];
    for row in rows {
        slots.push(row?);
    }
    Ok(slots)
}

pub fn service_bookings_since(
    conn: &Connection,
    account_id: i64,
    service: ServiceKind,
    cutoff: NaiveDate,
) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM appointments
         WHERE account_id = ?1 AND service = ?2 AND appointment_date >= ?3 AND status != 'Cancelled'",
        params![account_id, service.as_str(), cutoff.format(DATE_FMT).to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[derive(Default)]
pub struct AppointmentFilter<'a> {
    pub q: Option<&'a str>,
    pub status: Option<AppointmentStatus>,
    pub artist: Option<&'a str>,
    pub staff_id: Option<i64>,
    pub history_only: bool,
    pub exclude_history: bool,
    pub sort: Option<&'a str>,
    pub page: i64,
    pub per_page: i64,
}

pub fn list_appointments(
    conn: &Connection,
    filter: &AppointmentFilter,
) -> anyhow::Result<(Vec<Appointment>, i64)> {
    let mut where_clauses: Vec<String> = vec![];
    let mut filter_params: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];

    if let Some(status) = filter.status {
        filter_params.push(Box::new(status.as_str().to_string()));
        where_clauses.push(format!("status = ?{}", filter_params.len()));
    } else if filter.history_only {
        where_clauses.push("status IN ('Completed', 'Abandoned', 'Cancelled')".to_string());
    } else if filter.exclude_history {
        where_clauses.push("status NOT IN ('Completed', 'Abandoned', 'Cancelled')".to_string());
    }

    if let Some(q) = filter.q {
        let like = format!("%{q}%");
        filter_params.push(Box::new(like));
        let n = filter_params.len();
        where_clauses.push(format!(
            "(fullname LIKE ?{n} OR service LIKE ?{n} OR staff_name LIKE ?{n} OR id LIKE ?{n})"
        ));
    }

    if let Some(artist) = filter.artist {
        filter_params.push(Box::new(artist.trim().to_string()));
        where_clauses.push(format!("staff_name = ?{}", filter_params.len()));
    }

    if let Some(staff_id) = filter.staff_id {
        filter_params.push(Box::new(staff_id));
        where_clauses.push(format!("staff_id = ?{}", filter_params.len()));
    }

    let where_sql = if where_clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", where_clauses.join(" AND "))
    };

    let order_sql = match filter.sort.unwrap_or("date") {
        "date_desc" => "appointment_date DESC, time DESC",
        "name" => "fullname ASC",
        "service" => "service ASC",
        "artist" => "staff_name ASC",
        _ => "appointment_date ASC, time ASC",
    };

    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        filter_params.iter().map(|p| p.as_ref()).collect();

    let count_sql = format!("SELECT COUNT(*) FROM appointments {where_sql}");
    let total: i64 = conn.query_row(&count_sql, param_refs.as_slice(), |row| row.get(0))?;

    let per_page = filter.per_page.max(1);
    let offset = (filter.page - 1).max(0) * per_page;
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments {where_sql}
         ORDER BY {order_sql} LIMIT {per_page} OFFSET {offset}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(param_refs.as_slice(), |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok((appointments, total))
}

pub struct AppointmentSummary {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
}

pub fn appointment_summary(conn: &Connection) -> anyhow::Result<AppointmentSummary> {
    conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(CASE WHEN status = 'Pending' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'Approved' THEN 1 ELSE 0 END), 0)
         FROM appointments",
        [],
        |row| {
            Ok(AppointmentSummary {
                total: row.get(0)?,
                pending: row.get(1)?,
                approved: row.get(2)?,
            })
        },
    )
    .map_err(Into::into)
}

pub fn monthly_service_counts(
    conn: &Connection,
    year: i32,
    month: u32,
) -> anyhow::Result<(i64, i64)> {
    let prefix = format!("{year:04}-{month:02}-%");
    let mut stmt = conn.prepare(
        "SELECT service, COUNT(*) FROM appointments
         WHERE appointment_date LIKE ?1 GROUP BY service",
    )?;
    let rows = stmt.query_map(params![prefix], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut haircut = 0;
    let mut tattoo = 0;
    for row in rows {
        let (service, count) = row?;
        match ServiceKind::parse(&service) {
            Some(ServiceKind::Haircut) => haircut = count,
            Some(ServiceKind::Tattoo) => tattoo = count,
            None => {}
        }
    }
    Ok((haircut, tattoo))
}

pub fn artist_performance(conn: &Connection, limit: i64) -> anyhow::Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT staff_name, COUNT(*) AS total_jobs FROM appointments
         WHERE status = 'Completed'
         GROUP BY staff_name ORDER BY total_jobs DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut performance = vec![];
    for row in rows {
        performance.push(row?);
    }
    Ok(performance)
}

pub fn pending_appointment_count(conn: &Connection) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM appointments WHERE status = 'Pending'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ── Staff unavailability ──

pub fn replace_unavailability(
    conn: &Connection,
    staff_id: i64,
    date: NaiveDate,
    slots: &[String],
) -> anyhow::Result<()> {
    let date_str = date.format(DATE_FMT).to_string();
    conn.execute(
        "DELETE FROM staff_unavailability WHERE staff_id = ?1 AND unavailable_date = ?2",
        params![staff_id, date_str],
    )?;
    for slot in slots {
        conn.execute(
            "INSERT INTO staff_unavailability (staff_id, unavailable_date, unavailable_time)
             VALUES (?1, ?2, ?3)",
            params![staff_id, date_str, slot],
        )?;
    }
    Ok(())
}

pub fn unavailability_slots(
    conn: &Connection,
    staff_id: i64,
    date: NaiveDate,
) -> anyhow::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT unavailable_time FROM staff_unavailability
         WHERE staff_id = ?1 AND unavailable_date = ?2 ORDER BY unavailable_time ASC",
    )?;
    let rows = stmt.query_map(
        params![staff_id, date.format(DATE_FMT).to_string()],
        |row| row.get::<_, String>(0),
    )?;

    let mut slots = vec![];
    for row in rows {
        slots.push(row?);
    }
    Ok(slots)
}

pub fn is_staff_unavailable(
    conn: &Connection,
    staff_id: i64,
    date: NaiveDate,
    slot: &str,
) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM staff_unavailability
         WHERE staff_id = ?1 AND unavailable_date = ?2 AND unavailable_time = ?3",
        params![staff_id, date.format(DATE_FMT).to_string(), slot],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn list_unavailability(
    conn: &Connection,
) -> anyhow::Result<Vec<(StaffUnavailability, String)>> {
    let mut stmt = conn.prepare(
        "SELECT u.staff_id, u.unavailable_date, u.unavailable_time, a.fullname
         FROM staff_unavailability u
         JOIN accounts a ON a.id = u.staff_id
         ORDER BY u.unavailable_date ASC, u.unavailable_time ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut entries = vec![];
    for row in rows {
        let (staff_id, date_str, slot, staff_name) = row?;
        let date = NaiveDate::parse_from_str(&date_str, DATE_FMT)
            .unwrap_or_else(|_| Utc::now().date_naive());
        entries.push((StaffUnavailability { staff_id, date, slot }, staff_name));
    }
    Ok(entries)
}

// ── Feedback ──

pub fn feedback_exists_for(conn: &Connection, account_id: i64) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM feedback WHERE account_id = ?1",
        params![account_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn insert_feedback(
    conn: &Connection,
    account_id: i64,
    username: &str,
    stars: i64,
    message: &str,
) -> anyhow::Result<i64> {
    let now = Utc::now().naive_utc().format(DATETIME_FMT).to_string();
    conn.execute(
        "INSERT INTO feedback (account_id, username, stars, message, date_submitted)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![account_id, username, stars, message, now],
    )?;
    Ok(conn.last_insert_rowid())
}

fn parse_feedback_row(row: &rusqlite::Row) -> anyhow::Result<Feedback> {
    let date_str: String = row.get(7)?;
    let date_submitted = NaiveDateTime::parse_from_str(&date_str, DATETIME_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());
    Ok(Feedback {
        id: row.get(0)?,
        account_id: row.get(1)?,
        username: row.get(2)?,
        stars: row.get(3)?,
        message: row.get(4)?,
        reply: row.get(5)?,
        resolved: row.get::<_, i64>(6)? != 0,
        date_submitted,
    })
}

const FEEDBACK_COLUMNS: &str =
    "id, account_id, username, stars, message, reply, resolved, date_submitted";

pub fn list_feedback(conn: &Connection) -> anyhow::Result<Vec<Feedback>> {
    let sql = format!("SELECT {FEEDBACK_COLUMNS} FROM feedback ORDER BY date_submitted DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_feedback_row(row)))?;

    let mut feedback = vec![];
    for row in rows {
        feedback.push(row??);
    }
    Ok(feedback)
}

pub fn list_feedback_filtered(
    conn: &Connection,
    resolved: Option<bool>,
    q: Option<&str>,
    sort: Option<&str>,
    page: i64,
    per_page: i64,
) -> anyhow::Result<(Vec<Feedback>, i64)> {
    let mut where_clauses: Vec<String> = vec![];
    let mut filter_params: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];

    if let Some(resolved) = resolved {
        where_clauses.push(format!("resolved = {}", if resolved { 1 } else { 0 }));
    }
    if let Some(q) = q {
        filter_params.push(Box::new(format!("%{q}%")));
        let n = filter_params.len();
        where_clauses.push(format!("(username LIKE ?{n} OR message LIKE ?{n})"));
    }

    let where_sql = if where_clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", where_clauses.join(" AND "))
    };

    let order_sql = match sort.unwrap_or("date") {
        "rating" => "stars DESC",
        _ => "date_submitted DESC",
    };

    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        filter_params.iter().map(|p| p.as_ref()).collect();

    let count_sql = format!("SELECT COUNT(*) FROM feedback {where_sql}");
    let total: i64 = conn.query_row(&count_sql, param_refs.as_slice(), |row| row.get(0))?;

    let per_page = per_page.max(1);
    let offset = (page - 1).max(0) * per_page;
    let sql = format!(
        "SELECT {FEEDBACK_COLUMNS} FROM feedback {where_sql}
         ORDER BY {order_sql} LIMIT {per_page} OFFSET {offset}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(param_refs.as_slice(), |row| Ok(parse_feedback_row(row)))?;

    let mut feedback = vec![];
    for row in rows {
        feedback.push(row??);
    }
    Ok((feedback, total))
}

pub fn get_feedback(conn: &Connection, id: i64) -> anyhow::Result<Option<Feedback>> {
    let sql = format!("SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_feedback_row(row)));

    match result {
        Ok(fb) => Ok(Some(fb?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn set_feedback_reply(conn: &Connection, id: i64, reply: &str) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE feedback SET reply = ?1, resolved = 1 WHERE id = ?2",
        params![reply, id],
    )?;
    Ok(count > 0)
}

pub fn set_feedback_resolved(conn: &Connection, id: i64, resolved: bool) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE feedback SET resolved = ?1 WHERE id = ?2",
        params![resolved as i64, id],
    )?;
    Ok(count > 0)
}

pub fn unanswered_feedback_count(conn: &Connection) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM feedback WHERE reply IS NULL OR reply = ''",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

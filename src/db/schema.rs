//! Database schema and migrations.
//!
//! Migrations are applied in order when the database is opened; the
//! `schema_version` table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: roles and administrators
    r#"
CREATE TABLE admin_roles (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    site_id     INTEGER NOT NULL,
    name        TEXT NOT NULL,
    status      INTEGER NOT NULL DEFAULT 1,   -- 0 disabled, 1 enabled
    created_at  TEXT NOT NULL
);

CREATE INDEX idx_admin_roles_site ON admin_roles(site_id, status);

CREATE TABLE admins (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    site_id             INTEGER NOT NULL,
    username            TEXT NOT NULL,
    nickname            TEXT NOT NULL,
    password            TEXT NOT NULL,       -- Argon2 hash
    role_id             INTEGER NOT NULL DEFAULT 0,
    status              INTEGER NOT NULL DEFAULT 1,
    two_factor_enabled  INTEGER NOT NULL DEFAULT 0,
    two_factor_secret   TEXT,                -- base32 TOTP secret
    last_login_ip       TEXT,
    last_login_at       TEXT,
    deleted_at          TEXT,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL,
    UNIQUE (site_id, username)
);

CREATE INDEX idx_admins_site_status ON admins(site_id, status);
"#,
    // v2: permission records forming the menu tree
    r#"
CREATE TABLE admin_permissions (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    parent_id     INTEGER NOT NULL DEFAULT 0,   -- 0 = root
    name          TEXT NOT NULL,
    type          INTEGER NOT NULL DEFAULT 1,   -- 1 menu, 2 operation
    backend_url   TEXT NOT NULL DEFAULT '',
    frontend_url  TEXT NOT NULL DEFAULT '',
    icon          TEXT NOT NULL DEFAULT '',
    sort          INTEGER NOT NULL DEFAULT 0,
    status        INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX idx_admin_permissions_order ON admin_permissions(status, sort, id);
"#,
    // v3: audit trail
    r#"
CREATE TABLE admin_logs (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    site_id         INTEGER NOT NULL,
    admin_id        INTEGER NOT NULL,
    admin_username  TEXT NOT NULL,
    ip              TEXT NOT NULL DEFAULT '',
    remark          TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE INDEX idx_admin_logs_site_created ON admin_logs(site_id, created_at);
CREATE INDEX idx_admin_logs_admin ON admin_logs(admin_username);
"#,
    // v4: default role and back-office menus
    r#"
INSERT INTO admin_roles (id, site_id, name, status, created_at)
VALUES (1, 1, 'Super Administrator', 1, '1970-01-01T00:00:00+00:00');

INSERT INTO admin_permissions (id, parent_id, name, type, backend_url, frontend_url, icon, sort, status) VALUES
    (1, 0, 'System', 1, '', '/system', 'setting', 100, 1),
    (2, 1, 'Administrators', 1, '/api/admin/admins', '/system/admins', 'user', 1, 1),
    (3, 2, 'Create administrator', 2, '/api/admin/admins', '', '', 1, 1),
    (4, 2, 'Edit administrator', 2, '/api/admin/admins/:id', '', '', 2, 1),
    (5, 2, 'Delete administrator', 2, '/api/admin/admins/:id', '', '', 3, 1),
    (6, 1, 'Audit log', 1, '/api/admin/logs', '/system/logs', 'document', 2, 1),
    (7, 1, 'Roles', 1, '/api/admin/roles', '/system/roles', 'peoples', 3, 1);
"#,
];

pub const SCHEMA: &str = "
-- Prompt records: the single source of truth
CREATE TABLE IF NOT EXISTS prompts (
    id INTEGER PRIMARY KEY AUTOINCREMENT, -- never reused
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    tags TEXT NOT NULL DEFAULT '[]',      -- JSON array, deduped case-insensitively
    is_favorite INTEGER NOT NULL DEFAULT 0,
    score_avg REAL NOT NULL DEFAULT 0,    -- running mean of rated usage entries
    score_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,             -- RFC 3339 UTC
    updated_at TEXT NOT NULL
);

-- Immutable snapshots of pre-edit content, append-only
CREATE TABLE IF NOT EXISTS prompt_versions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    prompt_id INTEGER NOT NULL,
    content TEXT NOT NULL,
    change_note TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    FOREIGN KEY(prompt_id) REFERENCES prompts(id) ON DELETE CASCADE
);

-- One row per render-and-use event, optionally rated
CREATE TABLE IF NOT EXISTS usage_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    prompt_id INTEGER NOT NULL,
    input_vars TEXT NOT NULL DEFAULT '{}', -- JSON object, variable name to value
    output_text TEXT NOT NULL,
    rating INTEGER,                        -- NULL means not rated
    used_at TEXT NOT NULL,
    FOREIGN KEY(prompt_id) REFERENCES prompts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_prompts_updated_at ON prompts(updated_at);
CREATE INDEX IF NOT EXISTS idx_prompt_versions_prompt_id ON prompt_versions(prompt_id);
CREATE INDEX IF NOT EXISTS idx_usage_logs_prompt_id ON usage_logs(prompt_id);
";

//! Static table descriptors: which request keys map to which columns, their SQL types and rules.
//! Identifiers used by the SQL builder come only from here.

/// How a request value is checked and bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Email,
    Date,
    Integer,
    OperatingSystem,
}

#[derive(Debug)]
pub struct Column {
    /// Key in the JSON request body.
    pub key: &'static str,
    /// Column name in the table.
    pub name: &'static str,
    /// SQL type used to cast the bound parameter.
    pub pg_type: &'static str,
    pub required: bool,
    pub nullable: bool,
    pub max_length: Option<usize>,
    pub format: Format,
}

#[derive(Debug)]
pub struct Table {
    pub name: &'static str,
    pub pk: &'static str,
    /// Columns writable from a request body, in the order used for messages.
    pub columns: &'static [Column],
    /// Column list for RETURNING and plain SELECTs.
    pub returning: &'static [&'static str],
    /// Request keys a PATCH may change, in the order listed back to the client.
    pub updatable: &'static [&'static str],
}

impl Table {
    pub fn column_by_key(&self, key: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Request keys accepted for this table, comma separated.
    pub fn keys(&self) -> String {
        self.columns.iter().map(|c| c.key).collect::<Vec<_>>().join(",")
    }

    pub fn updatable_columns(&self) -> impl Iterator<Item = &'static Column> + '_ {
        self.updatable.iter().filter_map(|key| self.column_by_key(key))
    }
}

const fn text(key: &'static str, name: &'static str, pg_type: &'static str, max: Option<usize>) -> Column {
    Column {
        key,
        name,
        pg_type,
        required: true,
        nullable: false,
        max_length: max,
        format: Format::Text,
    }
}

pub static DEVELOPERS: Table = Table {
    name: "developers",
    pk: "id",
    columns: &[
        text("name", "name", "varchar", Some(50)),
        Column {
            format: Format::Email,
            ..text("email", "email", "varchar", Some(50))
        },
    ],
    returning: &["id", "name", "email"],
    updatable: &["name", "email"],
};

pub static DEVELOPER_INFOS: Table = Table {
    name: "developer_infos",
    pk: "id",
    columns: &[
        Column {
            format: Format::Date,
            ..text("developerSince", "developer_since", "date", None)
        },
        Column {
            format: Format::OperatingSystem,
            ..text("preferredOS", "preferred_os", "os_type", None)
        },
    ],
    returning: &["id", "developer_since", "preferred_os", "developer_id"],
    updatable: &[],
};

/// Owner column of `developer_infos`; filled from the path, never from the body.
pub static DEVELOPER_INFO_OWNER: Column = Column {
    format: Format::Integer,
    ..text("developerId", "developer_id", "bigint", None)
};

pub static PROJECTS: Table = Table {
    name: "projects",
    pk: "id",
    columns: &[
        text("name", "name", "varchar", Some(50)),
        text("description", "description", "text", None),
        text("estimatedTime", "estimated_time", "varchar", Some(20)),
        text("repository", "repository", "varchar", Some(120)),
        Column {
            format: Format::Date,
            ..text("startDate", "start_date", "date", None)
        },
        Column {
            format: Format::Date,
            required: false,
            nullable: true,
            ..text("endDate", "end_date", "date", None)
        },
        Column {
            format: Format::Integer,
            ..text("developerId", "developer_id", "bigint", None)
        },
    ],
    returning: &[
        "id",
        "name",
        "description",
        "estimated_time",
        "repository",
        "start_date",
        "end_date",
        "developer_id",
    ],
    updatable: &["name", "description", "repository", "startDate", "endDate", "estimatedTime"],
};

pub static TECHNOLOGIES: Table = Table {
    name: "technologies",
    pk: "id",
    columns: &[text("name", "name", "varchar", Some(30))],
    returning: &["id", "name"],
    updatable: &[],
};

/// Technology names seeded into `technologies`; anything else is rejected.
pub const SUPPORTED_TECHNOLOGIES: &[&str] = &[
    "JavaScript",
    "Python",
    "React",
    "Express.js",
    "HTML",
    "CSS",
    "Django",
    "PostgreSQL",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_keys_keep_declaration_order() {
        assert_eq!(
            PROJECTS.keys(),
            "name,description,estimatedTime,repository,startDate,endDate,developerId"
        );
    }

    #[test]
    fn only_end_date_is_optional() {
        let optional: Vec<_> = PROJECTS.columns.iter().filter(|c| !c.required).map(|c| c.key).collect();
        assert_eq!(optional, vec!["endDate"]);
    }

    #[test]
    fn lookup_by_request_key() {
        let c = DEVELOPER_INFOS.column_by_key("preferredOS").unwrap();
        assert_eq!(c.name, "preferred_os");
        assert_eq!(c.format, Format::OperatingSystem);
        assert!(DEVELOPERS.column_by_key("id").is_none());
    }

    #[test]
    fn project_owner_is_not_updatable() {
        let keys: Vec<_> = PROJECTS.updatable_columns().map(|c| c.key).collect();
        assert_eq!(
            keys,
            vec!["name", "description", "repository", "startDate", "endDate", "estimatedTime"]
        );
        for table in [&DEVELOPERS, &DEVELOPER_INFOS, &PROJECTS, &TECHNOLOGIES] {
            assert_eq!(table.updatable_columns().count(), table.updatable.len(), "{}", table.name);
        }
    }
}

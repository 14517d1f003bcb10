//! Tabular import/export adapters.
//!
//! Imports read the first table of a CSV file into header-keyed rows, then
//! map rows into domain records with per-feature header fallback chains
//! (localized header preferred, English fallback). Rows missing a mandatory
//! field are skipped, not fatal: a partially valid file imports its valid
//! rows. Nothing here persists anything; callers validate the full result
//! before saving.

use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::{
    new_id, Department, Employee, EmployeeStatus, Institution, Office, SchoolCycle,
};

/// One imported row, keyed by trimmed header name.
pub type Row = HashMap<String, String>;

/// Outcome of mapping an import file: the new full collection and how many
/// rows became records.
#[derive(Debug)]
pub struct ImportOutcome<T> {
    pub collection: Vec<T>,
    pub imported: usize,
}

/// Parse CSV bytes into header-keyed rows. A malformed file is a single
/// `AppError::Import`; individual row problems are handled later, during
/// mapping.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<Row>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Row::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if !cell.is_empty() {
                row.insert(header.clone(), cell.to_string());
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Read a cell through a header fallback chain.
fn cell<'a>(row: &'a Row, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|name| row.get(*name))
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}

fn cell_or<'a>(row: &'a Row, names: &[&str], fallback: &'a str) -> &'a str {
    cell(row, names).unwrap_or(fallback)
}

// ==================== STAFF ====================

/// Localized export headers for the staff sheet.
pub const STAFF_HEADERS: &[&str] = &["الاسم", "المهمة", "المصلحة", "المكتب", "الهاتف", "البريد"];

const FALLBACK_DEPARTMENT: &str = "غير مصنف";
const FALLBACK_OFFICE: &str = "المكتب الرئيسي";
const FALLBACK_ROLE: &str = "موظف";

/// Map staff rows into a copy of the department tree. Departments and
/// offices are matched by name and created on the fly; rows without a name
/// are skipped.
pub fn import_staff(rows: &[Row], tree: &[Department]) -> ImportOutcome<Department> {
    let mut collection = tree.to_vec();
    let mut imported = 0;

    for row in rows {
        let Some(name) = cell(row, &["الاسم", "Name"]) else {
            continue;
        };
        let dept_name = cell_or(row, &["المصلحة", "Department"], FALLBACK_DEPARTMENT);
        let office_name = cell_or(row, &["المكتب", "Office"], FALLBACK_OFFICE);
        let role = cell_or(row, &["المهمة", "Role"], FALLBACK_ROLE);
        let phone = cell_or(row, &["الهاتف", "Phone"], "");
        let email = cell_or(row, &["البريد", "Email"], "");

        let employee = Employee {
            id: new_id("emp"),
            name: name.to_string(),
            role: role.to_string(),
            department: dept_name.to_string(),
            office: office_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            image: None,
            status: EmployeeStatus::Online,
        };

        let dept = match collection.iter_mut().find(|d| d.name == dept_name) {
            Some(dept) => dept,
            None => {
                collection.push(Department {
                    id: new_id("dept"),
                    name: dept_name.to_string(),
                    offices: Vec::new(),
                });
                collection.last_mut().unwrap()
            }
        };
        let office = match dept.offices.iter_mut().find(|o| o.name == office_name) {
            Some(office) => office,
            None => {
                dept.offices.push(Office {
                    id: new_id("off"),
                    name: office_name.to_string(),
                    employees: Vec::new(),
                });
                dept.offices.last_mut().unwrap()
            }
        };
        office.employees.push(employee);
        imported += 1;
    }

    ImportOutcome { collection, imported }
}

/// Flatten the department tree to export rows, one per employee, under the
/// localized headers.
pub fn staff_to_rows(tree: &[Department]) -> Vec<Vec<String>> {
    tree.iter()
        .flat_map(|dept| {
            dept.offices.iter().flat_map(move |office| {
                office.employees.iter().map(move |emp| {
                    vec![
                        emp.name.clone(),
                        emp.role.clone(),
                        dept.name.clone(),
                        office.name.clone(),
                        emp.phone.clone(),
                        emp.email.clone(),
                    ]
                })
            })
        })
        .collect()
}

// ==================== INSTITUTIONS ====================

/// Localized export headers for the institution sheet. Group institutions
/// are flattened to one row per staffed unit.
pub const INSTITUTION_HEADERS: &[&str] = &[
    "المؤسسة",
    "الرمز",
    "السلك",
    "الجماعة",
    "مدير(ة) المؤسسة",
    "هاتف المؤسسة",
    "البريد الإلكتروني",
    "نوع الوحدة",
    "اسم الوحدة",
    "اسم الموظف",
    "المهمة",
    "هاتف الموظف",
];

const FALLBACK_PRINCIPAL: &str = "غير مسجل";

/// Map institution rows into a copy of the registry. Rows missing the name
/// or GRESA code are skipped. Imported institutions are plain schools, not
/// groups.
pub fn import_institutions(rows: &[Row], registry: &[Institution]) -> ImportOutcome<Institution> {
    let mut collection = registry.to_vec();
    let mut imported = 0;

    for row in rows {
        let Some(name) = cell(row, &["الاسم", "المؤسسة", "Name"]) else {
            continue;
        };
        let Some(gresa) = cell(row, &["الرمز", "GRESA"]) else {
            continue;
        };
        let cycle = cell(row, &["السلك", "Cycle"])
            .map(SchoolCycle::from_import_cell)
            .unwrap_or(SchoolCycle::Primary);
        let commune = cell_or(row, &["الجماعة", "Commune"], "");
        let principal = cell_or(
            row,
            &["مدير(ة) المؤسسة", "مدير المؤسسة", "المدير", "Principal"],
            FALLBACK_PRINCIPAL,
        );
        let phone = cell_or(row, &["الهاتف", "Phone"], "");
        let email = cell_or(row, &["البريد", "Email"], "");

        collection.push(Institution {
            id: new_id("sch"),
            name: name.to_string(),
            gresa: gresa.to_string(),
            cycle,
            commune: commune.to_string(),
            principal: principal.to_string(),
            phone: phone.to_string(),
            address: commune.to_string(),
            email: email.to_string(),
            is_group: None,
            sub_units: None,
            staff: None,
        });
        imported += 1;
    }

    ImportOutcome { collection, imported }
}

/// Flatten the registry to export rows: one administrative row per
/// institution, one row per central staff member and one per sub-unit staff
/// member, under the localized headers.
pub fn institutions_to_rows(registry: &[Institution]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    for inst in registry {
        let base = |unit_kind: &str, unit_name: &str, emp: &str, role: &str, phone: &str| {
            vec![
                inst.name.clone(),
                inst.gresa.clone(),
                inst.cycle.label().to_string(),
                inst.commune.clone(),
                inst.principal.clone(),
                inst.phone.clone(),
                inst.email.clone(),
                unit_kind.to_string(),
                unit_name.to_string(),
                emp.to_string(),
                role.to_string(),
                phone.to_string(),
            ]
        };

        rows.push(base(
            "مركزية",
            "الإدارة",
            &inst.principal,
            "مدير(ة) المؤسسة",
            &inst.phone,
        ));

        for staff in inst.staff.iter().flatten() {
            rows.push(base(
                "مركزية",
                "المركزية",
                &staff.name,
                &staff.role,
                &staff.phone,
            ));
        }

        for unit in inst.sub_units.iter().flatten() {
            for staff in unit.staff.iter().flatten() {
                rows.push(base("فرعية", &unit.name, &staff.name, &staff.role, &staff.phone));
            }
        }
    }

    rows
}

// ==================== SERIALIZATION ====================

/// Serialize headers plus rows to a downloadable CSV blob.
pub fn rows_to_csv(headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|err| AppError::Import(format!("CSV serialization failed: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_csv() -> &'static [u8] {
        "الاسم,المهمة,المصلحة,المكتب,الهاتف,البريد\n\
         أحمد العلوي,متصرف,مصلحة الشؤون الإدارية,مكتب الموارد البشرية,0600000001,a@men.gov.ma\n\
         ,بدون اسم,مصلحة الشؤون الإدارية,مكتب الموارد البشرية,0600000002,\n\
         فاطمة الزهراء,مهندسة,,,0600000003,\n"
            .as_bytes()
    }

    #[test]
    fn test_parse_rows_reads_headers() {
        let rows = parse_rows(staff_csv()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("الاسم").unwrap(), "أحمد العلوي");
    }

    #[test]
    fn test_malformed_file_is_one_error() {
        // Invalid UTF-8 cannot come from a real sheet export
        let result = parse_rows(&[0xff, 0xfe, 0x00, 0x01]);
        assert!(matches!(result, Err(AppError::Import(_))));
    }

    #[test]
    fn test_import_staff_partial_success() {
        let rows = parse_rows(staff_csv()).unwrap();
        let outcome = import_staff(&rows, &[]);
        // One row has no name and is skipped
        assert_eq!(outcome.imported, 2);

        let total: usize = outcome
            .collection
            .iter()
            .flat_map(|d| d.offices.iter())
            .map(|o| o.employees.len())
            .sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_import_staff_creates_containers_and_fallbacks() {
        let rows = parse_rows(staff_csv()).unwrap();
        let outcome = import_staff(&rows, &[]);

        let unclassified = outcome
            .collection
            .iter()
            .find(|d| d.name == "غير مصنف")
            .expect("fallback department created");
        assert_eq!(unclassified.offices[0].name, "المكتب الرئيسي");
        assert_eq!(unclassified.offices[0].employees[0].name, "فاطمة الزهراء");
        // Denormalized container names are taken from the row
        assert_eq!(unclassified.offices[0].employees[0].department, "غير مصنف");
    }

    #[test]
    fn test_import_staff_english_headers() {
        let csv = "Name,Role,Department,Office,Phone,Email\nJohn,Clerk,HR,Main,0611,j@x\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        let outcome = import_staff(&rows, &[]);
        assert_eq!(outcome.imported, 1);
        assert_eq!(outcome.collection[0].name, "HR");
    }

    #[test]
    fn test_import_institutions_requires_name_and_gresa() {
        let csv = "المؤسسة,الرمز,السلك,الجماعة\n\
                   مدرسة النور,11111A,الابتدائي,أوريكة\n\
                   مدرسة بلا رمز,,الابتدائي,أوريكة\n\
                   ,22222B,الثانوي الإعدادي,أسني\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        let outcome = import_institutions(&rows, &[]);
        assert_eq!(outcome.imported, 1);
        assert_eq!(outcome.collection[0].name, "مدرسة النور");
        assert_eq!(outcome.collection[0].cycle, SchoolCycle::Primary);
        // Address defaults to the commune, mirroring the legacy import
        assert_eq!(outcome.collection[0].address, "أوريكة");
    }

    #[test]
    fn test_staff_round_trip_through_rows() {
        let rows = parse_rows(staff_csv()).unwrap();
        let outcome = import_staff(&rows, &[]);
        let exported = staff_to_rows(&outcome.collection);
        assert_eq!(exported.len(), 2);
        let blob = rows_to_csv(STAFF_HEADERS, &exported).unwrap();
        let reparsed = parse_rows(&blob).unwrap();
        assert_eq!(reparsed.len(), 2);
        assert_eq!(reparsed[0].get("الاسم").unwrap(), "أحمد العلوي");
    }

    #[test]
    fn test_institutions_export_flattens_sub_units() {
        use crate::models::SubUnit;
        let inst = Institution {
            id: "sch-1".to_string(),
            name: "م.م الأطلس".to_string(),
            gresa: "03000X".to_string(),
            cycle: SchoolCycle::Primary,
            commune: "أسني".to_string(),
            principal: "مدير".to_string(),
            phone: "0600".to_string(),
            address: "أسني".to_string(),
            email: String::new(),
            is_group: Some(true),
            sub_units: Some(vec![SubUnit {
                id: "su-1".to_string(),
                name: "فرعية أ".to_string(),
                gresa: "03000X-1".to_string(),
                staff: Some(vec![Employee {
                    id: "st-1".to_string(),
                    name: "أستاذ".to_string(),
                    role: "أستاذ(ة)".to_string(),
                    department: "فرعية أ".to_string(),
                    office: "الوحدة المدرسية".to_string(),
                    email: String::new(),
                    phone: "0611".to_string(),
                    image: None,
                    status: EmployeeStatus::Online,
                }]),
            }]),
            staff: None,
        };

        let rows = institutions_to_rows(&[inst]);
        // One administrative row plus one sub-unit staff row
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][7], "فرعية");
        assert_eq!(rows[1][8], "فرعية أ");
        assert_eq!(rows[1][9], "أستاذ");
    }
}

//! Staff directory editor: the Department → Office → Employee tree.

use crate::errors::AppError;
use crate::mirror::{docs, RemoteMirror};
use crate::models::{
    new_id, Department, DirectoryEntry, Employee, EmployeeDraft, EmployeeStatus, Office,
};
use crate::store::keys;

use super::collection::{CollectionEditor, RemoteAddress};

const REMOTE: RemoteAddress = RemoteAddress {
    collection: docs::DATA_COLLECTION,
    document_id: docs::STAFF_LIST,
};

/// Editor for the staff directory tree.
#[derive(Debug, Clone)]
pub struct StaffEditor {
    inner: CollectionEditor<Department>,
}

impl StaffEditor {
    /// Load the directory from the cache, seeding the default tree on first
    /// boot.
    pub fn load(mirror: RemoteMirror) -> Self {
        let inner = CollectionEditor::load(mirror, keys::STAFF, Some(REMOTE), &[], seed());
        Self { inner }
    }

    /// The current department tree.
    pub fn departments(&self) -> &[Department] {
        self.inner.items()
    }

    /// Replace the whole tree (used after a validated import).
    pub fn replace_all(&mut self, departments: Vec<Department>) -> Result<(), AppError> {
        self.inner.replace_all(departments)
    }

    /// Manual pull-to-sync against the cloud snapshot.
    pub async fn sync(&mut self) -> Result<bool, AppError> {
        self.inner.sync().await
    }

    pub fn add_department(&mut self, name: &str) -> Result<Department, AppError> {
        let name = non_empty(name, "Department name is required")?;
        let department = Department {
            id: new_id("dept"),
            name,
            offices: Vec::new(),
        };
        let created = department.clone();
        self.inner.mutate(|tree| tree.push(department))?;
        Ok(created)
    }

    pub fn rename_department(&mut self, dept_id: &str, name: &str) -> Result<(), AppError> {
        let name = non_empty(name, "Department name is required")?;
        self.with_department(dept_id, |dept| dept.name = name)
    }

    pub fn delete_department(&mut self, dept_id: &str) -> Result<(), AppError> {
        self.require_department(dept_id)?;
        let id = dept_id.to_string();
        self.inner.mutate(|tree| tree.retain(|d| d.id != id))
    }

    pub fn add_office(&mut self, dept_id: &str, name: &str) -> Result<Office, AppError> {
        let name = non_empty(name, "Office name is required")?;
        let office = Office {
            id: new_id("off"),
            name,
            employees: Vec::new(),
        };
        let created = office.clone();
        self.with_department(dept_id, |dept| dept.offices.push(office))?;
        Ok(created)
    }

    pub fn delete_office(&mut self, dept_id: &str, office_id: &str) -> Result<(), AppError> {
        self.require_office(dept_id, office_id)?;
        let id = office_id.to_string();
        self.with_department(dept_id, |dept| dept.offices.retain(|o| o.id != id))
    }

    /// Add an employee to an office. The owning department and office names
    /// are denormalized onto the record at creation time.
    pub fn add_employee(
        &mut self,
        dept_id: &str,
        office_id: &str,
        draft: EmployeeDraft,
    ) -> Result<Employee, AppError> {
        if draft.name.trim().is_empty() {
            return Err(AppError::Validation("Employee name is required".to_string()));
        }
        let (dept_name, office_name) = self.container_names(dept_id, office_id)?;

        let employee = Employee {
            id: new_id("emp"),
            name: draft.name.trim().to_string(),
            role: draft.role,
            department: dept_name,
            office: office_name,
            email: draft.email,
            phone: draft.phone,
            image: draft.image,
            status: EmployeeStatus::Online,
        };
        let created = employee.clone();
        self.with_office(dept_id, office_id, |office| office.employees.push(employee))?;
        Ok(created)
    }

    /// Replace one employee record, located by id. Sibling records are
    /// structurally untouched.
    pub fn update_employee(
        &mut self,
        dept_id: &str,
        office_id: &str,
        employee: Employee,
    ) -> Result<(), AppError> {
        let office = self.require_office(dept_id, office_id)?;
        if !office.employees.iter().any(|e| e.id == employee.id) {
            return Err(AppError::NotFound(format!(
                "Employee {} not found",
                employee.id
            )));
        }
        self.with_office(dept_id, office_id, |office| {
            for slot in office.employees.iter_mut() {
                if slot.id == employee.id {
                    *slot = employee;
                    break;
                }
            }
        })
    }

    pub fn delete_employee(
        &mut self,
        dept_id: &str,
        office_id: &str,
        employee_id: &str,
    ) -> Result<(), AppError> {
        let office = self.require_office(dept_id, office_id)?;
        if !office.employees.iter().any(|e| e.id == employee_id) {
            return Err(AppError::NotFound(format!(
                "Employee {} not found",
                employee_id
            )));
        }
        let id = employee_id.to_string();
        self.with_office(dept_id, office_id, |office| {
            office.employees.retain(|e| e.id != id)
        })
    }

    /// Linear filter over the tree by name, role or phone. Empty query
    /// returns everyone.
    pub fn search(&self, query: &str) -> Vec<&Employee> {
        let needle = query.trim();
        self.inner
            .items()
            .iter()
            .flat_map(|dept| dept.offices.iter())
            .flat_map(|office| office.employees.iter())
            .filter(|emp| {
                needle.is_empty()
                    || emp.name.contains(needle)
                    || emp.role.contains(needle)
                    || emp.phone.contains(needle)
            })
            .collect()
    }

    /// Read-only recipient directory for other features (mail). This is the
    /// supported way to look up addressable staff; nothing else should read
    /// the staff cache key directly.
    pub fn directory_entries(&self) -> Vec<DirectoryEntry> {
        self.inner
            .items()
            .iter()
            .flat_map(|dept| {
                dept.offices.iter().flat_map(move |office| {
                    office.employees.iter().map(move |emp| DirectoryEntry {
                        id: emp.id.clone(),
                        name: emp.name.clone(),
                        role: emp.role.clone(),
                        department: dept.name.clone(),
                    })
                })
            })
            .collect()
    }

    fn container_names(
        &self,
        dept_id: &str,
        office_id: &str,
    ) -> Result<(String, String), AppError> {
        let dept = self.require_department(dept_id)?;
        let office = dept
            .offices
            .iter()
            .find(|o| o.id == office_id)
            .ok_or_else(|| AppError::NotFound(format!("Office {} not found", office_id)))?;
        Ok((dept.name.clone(), office.name.clone()))
    }

    fn require_department(&self, dept_id: &str) -> Result<&Department, AppError> {
        self.inner
            .items()
            .iter()
            .find(|d| d.id == dept_id)
            .ok_or_else(|| AppError::NotFound(format!("Department {} not found", dept_id)))
    }

    fn require_office(&self, dept_id: &str, office_id: &str) -> Result<&Office, AppError> {
        self.require_department(dept_id)?
            .offices
            .iter()
            .find(|o| o.id == office_id)
            .ok_or_else(|| AppError::NotFound(format!("Office {} not found", office_id)))
    }

    fn with_department<F>(&mut self, dept_id: &str, apply: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Department),
    {
        self.require_department(dept_id)?;
        let id = dept_id.to_string();
        self.inner.mutate(|tree| {
            if let Some(dept) = tree.iter_mut().find(|d| d.id == id) {
                apply(dept);
            }
        })
    }

    fn with_office<F>(&mut self, dept_id: &str, office_id: &str, apply: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Office),
    {
        self.require_office(dept_id, office_id)?;
        let dept_id = dept_id.to_string();
        let office_id = office_id.to_string();
        self.inner.mutate(|tree| {
            if let Some(office) = tree
                .iter_mut()
                .find(|d| d.id == dept_id)
                .and_then(|d| d.offices.iter_mut().find(|o| o.id == office_id))
            {
                apply(office);
            }
        })
    }
}

fn non_empty(value: &str, message: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Default tree shown before any data has been entered or synced.
fn seed() -> Vec<Department> {
    vec![Department {
        id: "dept_1".to_string(),
        name: "مصلحة الشؤون الإدارية والمالية والبنايات".to_string(),
        offices: vec![Office {
            id: "off_1".to_string(),
            name: "مكتب الموارد البشرية".to_string(),
            employees: vec![Employee {
                id: "emp_1".to_string(),
                name: "ياسين الفاضلي".to_string(),
                role: "رئيس مصلحة الشؤون الإدارية".to_string(),
                department: "الشؤون الإدارية".to_string(),
                office: "المكتب الرئيسي".to_string(),
                phone: "0661223344".to_string(),
                email: "y.fadili@men.gov.ma".to_string(),
                image: None,
                status: EmployeeStatus::Online,
            }],
        }],
    }]
}

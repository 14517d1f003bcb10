//! Institution registry editor: schools and school groups per commune.

use crate::errors::AppError;
use crate::mirror::{docs, RemoteMirror};
use crate::models::{new_id, Employee, Institution, SchoolCycle, SubUnit};
use crate::store::keys;

use super::collection::{CollectionEditor, RemoteAddress};
use super::migrate;

const REMOTE: RemoteAddress = RemoteAddress {
    collection: docs::DATA_COLLECTION,
    document_id: docs::SCHOOL_REGISTRY,
};

/// Communes of the province, used for filtering and as import defaults.
pub const COMMUNES: &[&str] = &[
    "أبادو",
    "أزكور",
    "أسني",
    "أغبار",
    "أغمات",
    "أغواطيم",
    "أمغراس",
    "أنكال",
    "أوريكة",
    "أوكايمدن",
    "أولاد امطاع",
    "إجوكاك",
    "إغيل",
    "إكرفروان",
    "إمكدال",
    "التوامة",
    "ثلاث نيعقوب",
    "آيت حكيم آيت يزيد",
    "آيت سيدي داود",
    "آيت عادل",
    "آيت فاسكا",
    "تديلي مسفيوة",
    "تزارت",
    "تزكين",
    "تغدوين",
    "تمزوزت",
    "تمصلوحت",
    "تمكرت",
    "دار الجامع",
    "زرقطن",
    "ستي فاطمة",
    "سيدي بدهاج",
    "سيدي عبد الله غيات",
    "للا تكركوست",
    "مولاي إبراهيم",
    "وزكيتة",
    "ويركان",
];

/// Fields supplied when registering an institution.
#[derive(Debug, Clone)]
pub struct InstitutionDraft {
    pub name: String,
    pub gresa: String,
    pub cycle: SchoolCycle,
    pub commune: String,
    pub principal: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub is_group: bool,
}

/// Filter over the registry; `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct RegistryFilter {
    pub cycle: Option<SchoolCycle>,
    pub commune: Option<String>,
    pub query: Option<String>,
}

/// Editor for the institution registry.
#[derive(Debug, Clone)]
pub struct RegistryEditor {
    inner: CollectionEditor<Institution>,
}

impl RegistryEditor {
    /// Load the registry, running the snapshot migration chain, seeding the
    /// default dataset on first boot.
    pub fn load(mirror: RemoteMirror) -> Self {
        let inner = CollectionEditor::load(
            mirror,
            keys::SCHOOLS,
            Some(REMOTE),
            migrate::SCHOOL_REGISTRY,
            seed(),
        );
        Self { inner }
    }

    pub fn institutions(&self) -> &[Institution] {
        self.inner.items()
    }

    /// Replace the whole registry (used after a validated import). Every
    /// institution is normalized on the way in.
    pub fn replace_all(&mut self, institutions: Vec<Institution>) -> Result<(), AppError> {
        let normalized = institutions.into_iter().map(normalize).collect();
        self.inner.replace_all(normalized)
    }

    /// Manual pull-to-sync against the cloud snapshot.
    pub async fn sync(&mut self) -> Result<bool, AppError> {
        self.inner.sync().await
    }

    pub fn add_institution(&mut self, draft: InstitutionDraft) -> Result<Institution, AppError> {
        if draft.name.trim().is_empty() || draft.gresa.trim().is_empty() {
            return Err(AppError::Validation(
                "Institution name and GRESA code are required".to_string(),
            ));
        }
        let institution = normalize(Institution {
            id: new_id("sch"),
            name: draft.name.trim().to_string(),
            gresa: draft.gresa.trim().to_string(),
            cycle: draft.cycle,
            commune: draft.commune,
            principal: draft.principal,
            phone: draft.phone,
            address: draft.address,
            email: draft.email,
            is_group: draft.is_group.then_some(true),
            sub_units: draft.is_group.then(Vec::new),
            staff: None,
        });
        let created = institution.clone();
        self.inner.mutate(|list| list.push(institution))?;
        Ok(created)
    }

    /// Replace one institution, located by id, normalizing it on the way in.
    pub fn update_institution(&mut self, institution: Institution) -> Result<(), AppError> {
        self.require(&institution.id)?;
        let institution = normalize(institution);
        self.inner.mutate(|list| {
            for slot in list.iter_mut() {
                if slot.id == institution.id {
                    *slot = institution;
                    break;
                }
            }
        })
    }

    pub fn delete_institution(&mut self, id: &str) -> Result<(), AppError> {
        self.require(id)?;
        let id = id.to_string();
        self.inner.mutate(|list| list.retain(|i| i.id != id))
    }

    /// Attach a satellite unit to a school group. Rejected for non-group
    /// institutions: only groups may carry sub-units.
    pub fn add_sub_unit(
        &mut self,
        institution_id: &str,
        name: &str,
        gresa: &str,
    ) -> Result<SubUnit, AppError> {
        let institution = self.require(institution_id)?;
        if !institution.is_group() {
            return Err(AppError::Validation(
                "Only a school group can have sub-units".to_string(),
            ));
        }
        if name.trim().is_empty() {
            return Err(AppError::Validation("Sub-unit name is required".to_string()));
        }
        let sub_unit = SubUnit {
            id: new_id("su"),
            name: name.trim().to_string(),
            gresa: gresa.trim().to_string(),
            staff: Some(Vec::new()),
        };
        let created = sub_unit.clone();
        let institution_id = institution_id.to_string();
        self.inner.mutate(|list| {
            if let Some(inst) = list.iter_mut().find(|i| i.id == institution_id) {
                inst.sub_units.get_or_insert_with(Vec::new).push(sub_unit);
            }
        })?;
        Ok(created)
    }

    pub fn delete_sub_unit(
        &mut self,
        institution_id: &str,
        sub_unit_id: &str,
    ) -> Result<(), AppError> {
        self.require(institution_id)?;
        let institution_id = institution_id.to_string();
        let sub_unit_id = sub_unit_id.to_string();
        self.inner.mutate(|list| {
            if let Some(units) = list
                .iter_mut()
                .find(|i| i.id == institution_id)
                .and_then(|i| i.sub_units.as_mut())
            {
                units.retain(|u| u.id != sub_unit_id);
            }
        })
    }

    /// Add a staff member to a sub-unit of a school group.
    pub fn add_sub_unit_staff(
        &mut self,
        institution_id: &str,
        sub_unit_id: &str,
        mut employee: Employee,
    ) -> Result<(), AppError> {
        let institution = self.require(institution_id)?;
        let unit = institution
            .sub_units
            .as_ref()
            .and_then(|units| units.iter().find(|u| u.id == sub_unit_id))
            .ok_or_else(|| AppError::NotFound(format!("Sub-unit {} not found", sub_unit_id)))?;
        if employee.id.is_empty() {
            employee.id = new_id("st");
        }
        employee.department = unit.name.clone();

        let institution_id = institution_id.to_string();
        let sub_unit_id = sub_unit_id.to_string();
        self.inner.mutate(|list| {
            if let Some(unit) = list
                .iter_mut()
                .find(|i| i.id == institution_id)
                .and_then(|i| i.sub_units.as_mut())
                .and_then(|units| units.iter_mut().find(|u| u.id == sub_unit_id))
            {
                unit.staff.get_or_insert_with(Vec::new).push(employee);
            }
        })
    }

    pub fn delete_sub_unit_staff(
        &mut self,
        institution_id: &str,
        sub_unit_id: &str,
        staff_id: &str,
    ) -> Result<(), AppError> {
        let institution = self.require(institution_id)?;
        let unit = institution
            .sub_units
            .as_ref()
            .and_then(|units| units.iter().find(|u| u.id == sub_unit_id))
            .ok_or_else(|| AppError::NotFound(format!("Sub-unit {} not found", sub_unit_id)))?;
        if !unit
            .staff
            .iter()
            .flatten()
            .any(|staff| staff.id == staff_id)
        {
            return Err(AppError::NotFound(format!(
                "Staff member {} not found",
                staff_id
            )));
        }

        let institution_id = institution_id.to_string();
        let sub_unit_id = sub_unit_id.to_string();
        let staff_id = staff_id.to_string();
        self.inner.mutate(|list| {
            if let Some(staff) = list
                .iter_mut()
                .find(|i| i.id == institution_id)
                .and_then(|i| i.sub_units.as_mut())
                .and_then(|units| units.iter_mut().find(|u| u.id == sub_unit_id))
                .and_then(|u| u.staff.as_mut())
            {
                staff.retain(|s| s.id != staff_id);
            }
        })
    }

    /// Linear filter by cycle, commune and free text over name/gresa/principal.
    pub fn filter(&self, filter: &RegistryFilter) -> Vec<&Institution> {
        self.inner
            .items()
            .iter()
            .filter(|inst| filter.cycle.map_or(true, |c| inst.cycle == c))
            .filter(|inst| {
                filter
                    .commune
                    .as_deref()
                    .map_or(true, |commune| inst.commune == commune)
            })
            .filter(|inst| {
                filter.query.as_deref().map_or(true, |query| {
                    let query = query.trim();
                    query.is_empty()
                        || inst.name.contains(query)
                        || inst.gresa.contains(query)
                        || inst.principal.contains(query)
                })
            })
            .collect()
    }

    fn require(&self, id: &str) -> Result<&Institution, AppError> {
        self.inner
            .items()
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Institution {} not found", id)))
    }
}

/// Enforce the group invariant at the boundary: only a group institution
/// carries sub-units or central staff.
fn normalize(mut institution: Institution) -> Institution {
    if !institution.is_group() {
        institution.sub_units = None;
        institution.staff = None;
    }
    institution
}

/// Default registry shown before any data has been entered or synced.
fn seed() -> Vec<Institution> {
    vec![Institution {
        id: "sch-101".to_string(),
        name: "مجموعة مدارس تحناوت المركزية".to_string(),
        gresa: "04523T".to_string(),
        cycle: SchoolCycle::Primary,
        commune: "أغواطيم".to_string(),
        principal: "عبد العزيز الإدريسي".to_string(),
        phone: "0661009988".to_string(),
        address: "تحناوت - قرب العمالة".to_string(),
        email: "tah.central@men.gov.ma".to_string(),
        is_group: Some(true),
        sub_units: Some(vec![
            SubUnit {
                id: "su-101".to_string(),
                name: "فرعية آيت المودن".to_string(),
                gresa: "04523T-1".to_string(),
                staff: Some(Vec::new()),
            },
            SubUnit {
                id: "su-102".to_string(),
                name: "فرعية تمزميزت".to_string(),
                gresa: "04523T-2".to_string(),
                staff: Some(Vec::new()),
            },
        ]),
        staff: None,
    }]
}

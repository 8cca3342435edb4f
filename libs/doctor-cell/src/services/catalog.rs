use crate::models::Doctor;

/// Fixed roster of specialists offered for virtual consultations.
pub struct DoctorCatalog {
    doctors: Vec<Doctor>,
}

impl DoctorCatalog {
    pub fn new() -> Self {
        let doctors = vec![
            Doctor {
                name: "Dr. John Smith".to_string(),
                specialization: "General Physician".to_string(),
                experience: "15+ years".to_string(),
                fee: "$100".to_string(),
                availability: "Mon-Fri".to_string(),
                education: "MD, Internal Medicine".to_string(),
                glyph: "🧑‍⚕️".to_string(),
            },
            Doctor {
                name: "Dr. Sarah Johnson".to_string(),
                specialization: "Cardiologist".to_string(),
                experience: "12+ years".to_string(),
                fee: "$150".to_string(),
                availability: "Mon-Wed".to_string(),
                education: "MD, Cardiology".to_string(),
                glyph: "👩‍⚕️".to_string(),
            },
            Doctor {
                name: "Dr. Michael Chen".to_string(),
                specialization: "Pediatrician".to_string(),
                experience: "10+ years".to_string(),
                fee: "$120".to_string(),
                availability: "Tue-Sat".to_string(),
                education: "MD, Pediatrics".to_string(),
                glyph: "👨‍⚕️".to_string(),
            },
            Doctor {
                name: "Dr. Emily Williams".to_string(),
                specialization: "Dermatologist".to_string(),
                experience: "8+ years".to_string(),
                fee: "$130".to_string(),
                availability: "Wed-Fri".to_string(),
                education: "MD, Dermatology".to_string(),
                glyph: "👩‍⚕️".to_string(),
            },
        ];

        Self { doctors }
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    /// Look up a doctor by display name. Names are the catalog's unique key.
    pub fn find(&self, name: &str) -> Option<&Doctor> {
        let name = name.trim();
        self.doctors.iter().find(|d| d.name == name)
    }
}

impl Default for DoctorCatalog {
    fn default() -> Self {
        Self::new()
    }
}

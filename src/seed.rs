use crate::model::{
    Announcement, Audience, Gender, Parent, Priority, Role, Student, Teacher, User,
};

/// Fixed demo credential table. Plaintext by design of the demo login;
/// there is no account management surface.
pub struct Credential {
    pub user: User,
    pub password: &'static str,
}

pub fn credentials() -> Vec<Credential> {
    vec![
        Credential {
            user: User {
                id: "1".to_string(),
                name: "Admin User".to_string(),
                email: "admin@school.com".to_string(),
                role: Role::Admin,
                photo: Some("https://api.dicebear.com/7.x/avataaars/svg?seed=admin".to_string()),
            },
            password: "admin123",
        },
        Credential {
            user: User {
                id: "2".to_string(),
                name: "John Teacher".to_string(),
                email: "teacher@school.com".to_string(),
                role: Role::Teacher,
                photo: Some("https://api.dicebear.com/7.x/avataaars/svg?seed=teacher".to_string()),
            },
            password: "teacher123",
        },
        Credential {
            user: User {
                id: "3".to_string(),
                name: "Sarah Parent".to_string(),
                email: "parent@school.com".to_string(),
                role: Role::Parent,
                photo: Some("https://api.dicebear.com/7.x/avataaars/svg?seed=parent".to_string()),
            },
            password: "parent123",
        },
    ]
}

pub fn initial_students() -> Vec<Student> {
    vec![
        Student {
            id: "1".to_string(),
            name: "Emma Johnson".to_string(),
            photo: Some("https://api.dicebear.com/7.x/avataaars/svg?seed=Emma".to_string()),
            roll_number: "S001".to_string(),
            class: "10".to_string(),
            section: "A".to_string(),
            date_of_birth: "2010-05-15".to_string(),
            gender: Gender::Female,
            parent_id: "3".to_string(),
            parent_name: "Sarah Parent".to_string(),
            contact_number: "+1234567890".to_string(),
            email: "emma.j@student.school.com".to_string(),
            address: "123 Main St, City".to_string(),
            admission_date: "2020-04-01".to_string(),
            blood_group: Some("O+".to_string()),
            attendance_percentage: 92.0,
        },
        Student {
            id: "2".to_string(),
            name: "Michael Brown".to_string(),
            photo: Some("https://api.dicebear.com/7.x/avataaars/svg?seed=Michael".to_string()),
            roll_number: "S002".to_string(),
            class: "10".to_string(),
            section: "A".to_string(),
            date_of_birth: "2010-08-22".to_string(),
            gender: Gender::Male,
            parent_id: "4".to_string(),
            parent_name: "Robert Brown".to_string(),
            contact_number: "+1234567891".to_string(),
            email: "michael.b@student.school.com".to_string(),
            address: "456 Oak Ave, City".to_string(),
            admission_date: "2020-04-01".to_string(),
            blood_group: Some("A+".to_string()),
            attendance_percentage: 88.0,
        },
        Student {
            id: "3".to_string(),
            name: "Sophia Davis".to_string(),
            photo: Some("https://api.dicebear.com/7.x/avataaars/svg?seed=Sophia".to_string()),
            roll_number: "S003".to_string(),
            class: "9".to_string(),
            section: "B".to_string(),
            date_of_birth: "2011-03-10".to_string(),
            gender: Gender::Female,
            parent_id: "5".to_string(),
            parent_name: "Jennifer Davis".to_string(),
            contact_number: "+1234567892".to_string(),
            email: "sophia.d@student.school.com".to_string(),
            address: "789 Pine Rd, City".to_string(),
            admission_date: "2021-04-01".to_string(),
            blood_group: Some("B+".to_string()),
            attendance_percentage: 95.0,
        },
    ]
}

pub fn initial_teachers() -> Vec<Teacher> {
    vec![
        Teacher {
            id: "2".to_string(),
            name: "John Teacher".to_string(),
            photo: Some("https://api.dicebear.com/7.x/avataaars/svg?seed=teacher".to_string()),
            email: "teacher@school.com".to_string(),
            phone: "+1234567800".to_string(),
            subject: "Mathematics".to_string(),
            qualification: "M.Sc Mathematics, B.Ed".to_string(),
            date_of_joining: "2018-07-01".to_string(),
            address: "100 School St, City".to_string(),
            salary: 50000.0,
        },
        Teacher {
            id: "6".to_string(),
            name: "Emily Wilson".to_string(),
            photo: Some("https://api.dicebear.com/7.x/avataaars/svg?seed=Emily".to_string()),
            email: "emily.w@school.com".to_string(),
            phone: "+1234567801".to_string(),
            subject: "English".to_string(),
            qualification: "M.A English, B.Ed".to_string(),
            date_of_joining: "2019-08-01".to_string(),
            address: "200 Teacher Ave, City".to_string(),
            salary: 48000.0,
        },
    ]
}

pub fn initial_parents() -> Vec<Parent> {
    vec![
        Parent {
            id: "3".to_string(),
            name: "Sarah Parent".to_string(),
            email: "parent@school.com".to_string(),
            phone: "+1234567890".to_string(),
            address: "123 Main St, City".to_string(),
            occupation: "Software Engineer".to_string(),
            student_ids: vec!["1".to_string()],
        },
        Parent {
            id: "4".to_string(),
            name: "Robert Brown".to_string(),
            email: "robert.b@parent.com".to_string(),
            phone: "+1234567891".to_string(),
            address: "456 Oak Ave, City".to_string(),
            occupation: "Business Owner".to_string(),
            student_ids: vec!["2".to_string()],
        },
        Parent {
            id: "5".to_string(),
            name: "Jennifer Davis".to_string(),
            email: "jennifer.d@parent.com".to_string(),
            phone: "+1234567892".to_string(),
            address: "789 Pine Rd, City".to_string(),
            occupation: "Doctor".to_string(),
            student_ids: vec!["3".to_string()],
        },
    ]
}

pub fn initial_announcements() -> Vec<Announcement> {
    vec![
        Announcement {
            id: "1".to_string(),
            title: "Annual Day Celebration".to_string(),
            message: "Annual Day will be celebrated on March 15, 2026. Parents are cordially invited to attend.".to_string(),
            target_audience: Audience::All,
            created_by: "Admin User".to_string(),
            created_at: "2026-02-01T10:00:00Z".to_string(),
            priority: Priority::High,
        },
        Announcement {
            id: "2".to_string(),
            title: "Mid-Term Exam Schedule".to_string(),
            message: "Mid-term examinations will commence from February 20, 2026. Please ensure students are well prepared.".to_string(),
            target_audience: Audience::Parents,
            created_by: "Admin User".to_string(),
            created_at: "2026-02-03T09:00:00Z".to_string(),
            priority: Priority::High,
        },
    ]
}

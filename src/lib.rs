pub mod configuration;

pub mod manager {
    pub mod namedobject;
    pub mod managererror;
    pub mod manager;
}

pub mod time {
    pub mod utility;
    pub mod weekdaymask;
    pub mod rangeofdates;
    pub mod locale;

    pub mod daterule {
        pub mod easter;
        pub mod fixeddaterule;
        pub mod nthweekdayrule;
        pub mod lastweekdayonorbeforerule;
        pub mod anchoroffsetrule;
        pub mod daterule;
    }

    pub mod holiday {
        pub mod holidayerror;
        pub mod holiday;
        pub mod holidaycollection;
        pub mod ruledescriptor;
        pub mod substitution;
    }

    pub mod jurisdiction {
        pub mod holidayprovider;
        pub mod jurisdiction;
        pub mod jurisdictionmanager;
    }
}

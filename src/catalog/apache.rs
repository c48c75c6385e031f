/// Apache Software Foundation Java projects, mirrored under github.com/apache.
///
/// Each identifier doubles as the JIRA project used for the issue count.
pub const APACHE_PROJECTS: &[&str] = &[
    "accumulo",
    "activemq",
    "ant",
    "ant-ivy",
    "avro",
    "bookkeeper",
    "camel",
    "cassandra",
    "cayenne",
    "commons-bcel",
    "commons-beanutils",
    "commons-cli",
    "commons-codec",
    "commons-collections",
    "commons-compress",
    "commons-configuration",
    "commons-csv",
    "commons-dbcp",
    "commons-io",
    "commons-jexl",
    "commons-lang",
    "commons-math",
    "commons-net",
    "commons-pool",
    "commons-text",
    "commons-vfs",
    "curator",
    "cxf",
    "derby",
    "drill",
    "flink",
    "giraph",
    "hadoop",
    "hbase",
    "hive",
    "httpcomponents-client",
    "httpcomponents-core",
    "jackrabbit",
    "jena",
    "jmeter",
    "kafka",
    "karaf",
    "logging-log4j2",
    "lucene",
    "maven",
    "mina",
    "nifi",
    "nutch",
    "oozie",
    "openjpa",
    "opennlp",
    "pdfbox",
    "pig",
    "poi",
    "shiro",
    "solr",
    "storm",
    "struts",
    "tika",
    "tomcat",
    "wicket",
    "xerces-j",
    "zookeeper",
];
